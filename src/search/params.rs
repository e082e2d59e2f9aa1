use crate::bls::{BlsOptions, GridOptions};
use crate::clean::CleanOptions;
use crate::detrend::DetrendOptions;
use serde::{Deserialize, Serialize};

/// Parameters of every stage of a [`TransitSearch`](super::TransitSearch).
///
/// Missing fields in a config file take the values of
/// [`SearchParams::default`]. The default cleaner rejects bright outliers
/// only; symmetric clipping can remove the in-transit samples of deep or
/// long transits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub clean: CleanOptions,
    pub detrend: DetrendOptions,
    pub grid: GridOptions,
    pub bls: BlsOptions,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            clean: CleanOptions::upper_only(5.0),
            detrend: DetrendOptions::default(),
            grid: GridOptions::default(),
            bls: BlsOptions::default(),
        }
    }
}
