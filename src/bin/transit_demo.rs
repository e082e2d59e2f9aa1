use std::env;
use std::path::PathBuf;
use transit_search::config::demo::{self, DemoConfig};
use transit_search::io::{read_json_file, write_json_file};
use transit_search::{LightCurve, TransitSearch};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "transit_demo".to_string());
    let config_path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    let config = demo::load_config(&config_path)?;

    let lc = load_light_curve(&config)?;
    let search = TransitSearch::new(config.search.clone());
    let report = search
        .run_with_diagnostics(&lc)
        .map_err(|e| e.to_string())?;

    report.print_text_summary();

    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report)?;
        println!("\nJSON report written to {}", path.display());
    }
    if let Some(path) = &config.output.periodogram_json {
        write_json_file(path, &report.periodogram)?;
        println!("Periodogram written to {}", path.display());
    }
    Ok(())
}

fn load_light_curve(config: &DemoConfig) -> Result<LightCurve, String> {
    match &config.input {
        Some(path) => read_json_file(path),
        None => config.synthetic.generate().map_err(|e| e.to_string()),
    }
}
