use crate::bls::Objective;
use serde::{Deserialize, Serialize};

/// Report of the cleaning stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanStage {
    pub input_samples: usize,
    pub output_samples: usize,
    pub non_finite_removed: usize,
    pub duplicates_removed: usize,
    pub outliers_removed: usize,
    /// Clip rounds executed.
    pub iterations: usize,
    /// False when the iteration cap stopped clipping early.
    pub converged: bool,
    /// Median flux of the final clip round.
    pub center: f64,
    /// Flux scale of the final clip round.
    pub scale: f64,
    pub elapsed_ms: f64,
}

/// Report of the detrending stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetrendStage {
    pub window_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadence_days: Option<f64>,
    pub polyorder: usize,
    /// Contiguous pieces the series was split into at time gaps.
    pub segments: usize,
    /// Samples excluded from the final trend fit as dip/outlier residuals.
    pub masked_samples: usize,
    pub elapsed_ms: f64,
}

/// Report of the BLS search stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlsStage {
    pub periods: usize,
    pub durations: usize,
    pub min_period: f64,
    pub max_period: f64,
    pub objective: Objective,
    /// True when per-sample flux errors weighted the fit.
    pub weighted: bool,
    /// Periods for which at least one admissible box window existed.
    pub fitted_periods: usize,
    pub parallel: bool,
    pub elapsed_ms: f64,
}
