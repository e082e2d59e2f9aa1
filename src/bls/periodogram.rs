use serde::{Deserialize, Serialize};

/// Best box found at one trial period.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxFit {
    pub duration: f64,
    /// Mid-transit time, reduced into `[t0, t0 + period)` where `t0` is the
    /// first timestamp of the searched light curve.
    pub epoch: f64,
    /// Out-of-transit mean minus in-transit mean; always positive.
    pub depth: f64,
    /// Weighted mean flux outside the box.
    pub baseline: f64,
    pub depth_snr: f64,
    pub in_transit_count: usize,
}

/// Detection statistic for every trial period.
///
/// `periods`, `power` and `fits` have the same length. A row whose `fit` is
/// `None` had no admissible box (no dip with samples both inside and
/// outside the window) and carries zero power.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Periodogram {
    pub periods: Vec<f64>,
    pub power: Vec<f64>,
    pub fits: Vec<Option<BoxFit>>,
}

impl Periodogram {
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn durations(&self) -> Vec<f64> {
        self.column(|f| f.duration)
    }

    pub fn epochs(&self) -> Vec<f64> {
        self.column(|f| f.epoch)
    }

    pub fn depths(&self) -> Vec<f64> {
        self.column(|f| f.depth)
    }

    pub fn fitted_rows(&self) -> usize {
        self.fits.iter().filter(|f| f.is_some()).count()
    }

    fn column(&self, pick: impl Fn(&BoxFit) -> f64) -> Vec<f64> {
        self.fits
            .iter()
            .map(|f| f.as_ref().map_or(f64::NAN, &pick))
            .collect()
    }
}
