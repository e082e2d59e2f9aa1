use serde::{Deserialize, Serialize};

/// Estimator used for the spread of the flux distribution while clipping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleEstimator {
    /// Population standard deviation.
    #[default]
    StdDev,
    /// Median absolute deviation scaled to a Gaussian sigma.
    MadStd,
}

/// Options for NaN removal and iterative sigma clipping.
///
/// - `sigma`: rejection threshold in scale units applied to both sides.
/// - `sigma_lower` / `sigma_upper`: per-side overrides of `sigma`.
/// - `clip_lower`: when false, samples below the centre are never rejected.
/// - `max_iters`: cap on clip/recompute rounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    pub sigma: f64,
    pub sigma_lower: Option<f64>,
    pub sigma_upper: Option<f64>,
    pub clip_lower: bool,
    pub max_iters: usize,
    pub scale: ScaleEstimator,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            sigma: 5.0,
            sigma_lower: None,
            sigma_upper: None,
            clip_lower: true,
            max_iters: 10,
            scale: ScaleEstimator::StdDev,
        }
    }
}

impl CleanOptions {
    /// Clip only bright outliers, leaving dips (transits) untouched.
    pub fn upper_only(sigma: f64) -> Self {
        Self {
            sigma,
            clip_lower: false,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: ScaleEstimator) -> Self {
        self.scale = scale;
        self
    }

    /// Lower rejection threshold; infinite when dips are never clipped.
    pub fn lower_threshold(&self) -> f64 {
        if self.clip_lower {
            self.sigma_lower.unwrap_or(self.sigma)
        } else {
            f64::INFINITY
        }
    }

    pub fn upper_threshold(&self) -> f64 {
        self.sigma_upper.unwrap_or(self.sigma)
    }
}
