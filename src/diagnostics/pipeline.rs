use super::{BlsStage, CleanStage, DetrendStage, TimingBreakdown};
use crate::types::LightCurve;
use serde::{Deserialize, Serialize};

/// Shape of the light curve handed to the search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub samples: usize,
    pub time_span_days: f64,
    pub has_flux_errors: bool,
}

impl InputDescriptor {
    pub fn from_light_curve(lc: &LightCurve) -> Self {
        Self {
            samples: lc.len(),
            time_span_days: lc.time_span(),
            has_flux_errors: !lc.is_empty() && lc.iter().all(|s| s.flux_err.is_some()),
        }
    }
}

/// End-to-end trace of one search run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub clean: CleanStage,
    pub detrend: DetrendStage,
    pub bls: BlsStage,
}
