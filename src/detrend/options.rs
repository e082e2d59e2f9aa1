use serde::{Deserialize, Serialize};

/// Window length (samples) used when the cadence cannot be estimated.
pub const FALLBACK_WINDOW_LENGTH: usize = 101;

/// Parameters of the sliding local-polynomial trend filter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetrendOptions {
    /// Smoothing window in days. Must exceed the expected transit duration
    /// by a comfortable factor so dips survive.
    pub window_days: f64,
    /// Degree of the local polynomial.
    pub polyorder: usize,
    /// Gaps longer than this many cadences split the series into
    /// independently detrended segments.
    pub break_tolerance: f64,
    /// Maximum number of polynomial fits after the running-median pass.
    /// Samples flagged by the residuals of one fit are skipped by the next.
    pub niters: usize,
    /// Residual rejection threshold (in residual standard deviations).
    pub mask_sigma: f64,
}

impl Default for DetrendOptions {
    fn default() -> Self {
        Self {
            window_days: 0.5,
            polyorder: 2,
            break_tolerance: 5.0,
            niters: 3,
            mask_sigma: 3.0,
        }
    }
}

impl DetrendOptions {
    pub fn with_window_days(mut self, window_days: f64) -> Self {
        self.window_days = window_days;
        self
    }
}
