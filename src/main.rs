use transit_search::bls::GridOptions;
use transit_search::synthetic::SyntheticSpec;
use transit_search::{SearchParams, TransitSearch};

fn main() {
    env_logger::init();

    // Demo stub: 20 days of noisy photometry with a 1% transit every 5 days
    let spec = SyntheticSpec {
        noise_sigma: 1e-3,
        variability_amplitude: 0.005,
        ..SyntheticSpec::default()
    };
    let lc = match spec.generate() {
        Ok(lc) => lc,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let search = TransitSearch::new(SearchParams {
        grid: GridOptions::default()
            .with_period_range(1.0, 10.0)
            .with_n_periods(2000),
        ..Default::default()
    });
    match search.run(&lc) {
        Ok(c) => println!(
            "period={:.4} epoch={:.4} duration={:.3} depth={:.5} power={:.3e}",
            c.period, c.epoch, c.duration, c.depth, c.power
        ),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
