use crate::io::read_json_file;
use crate::search::SearchParams;
use crate::synthetic::SyntheticSpec;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Runtime configuration of the `transit_demo` binary.
///
/// ```json
/// {
///   "synthetic": { "period": 5.0, "depth": 0.01, "noise_sigma": 0.001 },
///   "search": { "grid": { "min_period": 1.0, "max_period": 10.0, "n_periods": 2000 } },
///   "output": { "report_json": "out/report.json" }
/// }
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct DemoConfig {
    /// Light curve stored as JSON (`{"samples": [...]}`). Takes precedence
    /// over `synthetic` when present.
    #[serde(default)]
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub synthetic: SyntheticSpec,
    #[serde(default)]
    pub search: SearchParams,
    #[serde(default)]
    pub output: DemoOutputConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DemoOutputConfig {
    /// Full [`SearchReport`](crate::search::SearchReport) as JSON.
    pub report_json: Option<PathBuf>,
    /// Periodogram alone as JSON.
    pub periodogram_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<DemoConfig, String> {
    read_json_file(path).map_err(|e| format!("Invalid demo config: {e}"))
}
