//! Plain value types passed between pipeline stages.
//!
//! Every stage consumes one of these by reference and returns a freshly built
//! value; nothing here is mutated in place once handed to a stage.
use crate::error::{Result, TransitError};
use crate::stats;
use serde::{Deserialize, Serialize};

/// One photometric measurement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Observation time in days.
    pub time: f64,
    /// Flux, normalised near 1.0.
    pub flux: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flux_err: Option<f64>,
}

impl Sample {
    pub fn new(time: f64, flux: f64) -> Self {
        Self {
            time,
            flux,
            flux_err: None,
        }
    }

    pub fn with_error(time: f64, flux: f64, flux_err: f64) -> Self {
        Self {
            time,
            flux,
            flux_err: Some(flux_err),
        }
    }
}

/// Time-ordered sequence of samples.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LightCurve {
    samples: Vec<Sample>,
}

impl LightCurve {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Build from parallel columns. All columns must have the same length.
    pub fn from_columns(time: &[f64], flux: &[f64], flux_err: Option<&[f64]>) -> Result<Self> {
        if time.len() != flux.len() {
            return Err(TransitError::data(format!(
                "time/flux length mismatch: {} vs {}",
                time.len(),
                flux.len()
            )));
        }
        if let Some(err) = flux_err {
            if err.len() != time.len() {
                return Err(TransitError::data(format!(
                    "time/flux_err length mismatch: {} vs {}",
                    time.len(),
                    err.len()
                )));
            }
        }
        let samples = time
            .iter()
            .zip(flux)
            .enumerate()
            .map(|(i, (&t, &f))| Sample {
                time: t,
                flux: f,
                flux_err: flux_err.map(|e| e[i]),
            })
            .collect();
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    pub fn fluxes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.flux).collect()
    }

    /// Flux errors, only when every sample carries one.
    pub fn flux_errors(&self) -> Option<Vec<f64>> {
        self.samples.iter().map(|s| s.flux_err).collect()
    }

    /// Duration covered by the series (last minus first timestamp).
    pub fn time_span(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    /// Median spacing between consecutive timestamps, ignoring non-positive
    /// steps. `None` for fewer than two samples.
    pub fn median_cadence(&self) -> Option<f64> {
        let steps: Vec<f64> = self
            .samples
            .windows(2)
            .map(|w| w[1].time - w[0].time)
            .filter(|d| d.is_finite() && *d > 0.0)
            .collect();
        stats::median(&steps)
    }

    /// Divide flux and errors by the median flux.
    pub fn normalize(&self) -> Result<Self> {
        let flux = self.fluxes();
        let median = stats::median(&flux)
            .ok_or_else(|| TransitError::data("cannot normalise an empty light curve"))?;
        if !median.is_finite() || median <= 0.0 {
            return Err(TransitError::data(format!(
                "median flux {median} is not positive; cannot normalise"
            )));
        }
        let samples = self
            .samples
            .iter()
            .map(|s| Sample {
                time: s.time,
                flux: s.flux / median,
                flux_err: s.flux_err.map(|e| e / median),
            })
            .collect();
        Ok(Self { samples })
    }

    /// Keep the samples whose mask entry is `true`.
    pub fn select(&self, mask: &[bool]) -> Self {
        debug_assert_eq!(mask.len(), self.samples.len());
        let samples = self
            .samples
            .iter()
            .zip(mask)
            .filter_map(|(s, &keep)| keep.then_some(*s))
            .collect();
        Self { samples }
    }
}

impl FromIterator<Sample> for LightCurve {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LightCurve {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Best period, epoch, duration and depth reported by the search.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitCandidate {
    /// Orbital period in days.
    pub period: f64,
    /// Reference mid-transit time in days (defined modulo `period`).
    pub epoch: f64,
    /// Transit duration in days.
    pub duration: f64,
    /// Fractional flux decrement.
    pub depth: f64,
    /// Detection statistic at `period`.
    pub power: f64,
    /// Out-of-transit flux level of the box fit.
    pub baseline: f64,
    pub depth_snr: f64,
    pub in_transit_count: usize,
}

impl TransitCandidate {
    /// True when `time` falls inside a transit window of this candidate.
    pub fn is_in_transit(&self, time: f64) -> bool {
        let offset = (time - self.epoch + 0.5 * self.period).rem_euclid(self.period)
            - 0.5 * self.period;
        offset.abs() < 0.5 * self.duration
    }

    /// Evaluate the box-shaped best fit at `times`.
    pub fn box_model(&self, times: &[f64]) -> Vec<f64> {
        times
            .iter()
            .map(|&t| {
                if self.is_in_transit(t) {
                    self.baseline - self.depth
                } else {
                    self.baseline
                }
            })
            .collect()
    }
}

/// Single sample expressed in orbital phase.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoldedSample {
    /// Phase in `[-0.5, 0.5)`, zero at mid-transit.
    pub phase: f64,
    /// Original observation time.
    pub time: f64,
    pub flux: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flux_err: Option<f64>,
}

/// Mean flux of the folded samples falling into one phase bin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseBin {
    pub phase: f64,
    pub flux: f64,
    /// Standard error of the mean (zero for single-sample bins).
    pub flux_err: f64,
    pub count: usize,
}

/// Light curve re-expressed in orbital phase, ordered by ascending phase.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FoldedLightCurve {
    pub period: f64,
    pub epoch: f64,
    samples: Vec<FoldedSample>,
}

impl FoldedLightCurve {
    pub(crate) fn from_sorted(period: f64, epoch: f64, samples: Vec<FoldedSample>) -> Self {
        Self {
            period,
            epoch,
            samples,
        }
    }

    pub fn samples(&self) -> &[FoldedSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn phases(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.phase).collect()
    }

    pub fn fluxes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.flux).collect()
    }

    /// Average the folded flux into `n_bins` equal phase bins over
    /// `[-0.5, 0.5)`. Empty bins are omitted.
    pub fn bin(&self, n_bins: usize) -> Vec<PhaseBin> {
        if n_bins == 0 {
            return Vec::new();
        }
        let width = 1.0 / n_bins as f64;
        let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); n_bins];
        for s in &self.samples {
            let idx = (((s.phase + 0.5) / width).floor() as usize).min(n_bins - 1);
            buckets[idx].push(s.flux);
        }
        buckets
            .iter()
            .enumerate()
            .filter(|(_, values)| !values.is_empty())
            .map(|(idx, values)| {
                let (mean, std) = stats::mean_and_stddev(values);
                let count = values.len();
                let flux_err = if count > 1 {
                    std / (count as f64).sqrt()
                } else {
                    0.0
                };
                PhaseBin {
                    phase: -0.5 + (idx as f64 + 0.5) * width,
                    flux: mean,
                    flux_err,
                    count,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_columns_rejects_length_mismatch() {
        let err = LightCurve::from_columns(&[0.0, 1.0], &[1.0], None).unwrap_err();
        assert!(err.is_data());
    }

    #[test]
    fn flux_errors_require_every_sample() {
        let lc = LightCurve::new(vec![
            Sample::with_error(0.0, 1.0, 0.01),
            Sample::new(1.0, 1.0),
        ]);
        assert!(lc.flux_errors().is_none());
    }

    #[test]
    fn normalize_divides_by_median() {
        let lc = LightCurve::from_columns(&[0.0, 1.0, 2.0], &[200.0, 100.0, 100.0], None)
            .unwrap()
            .normalize()
            .unwrap();
        assert_eq!(lc.fluxes(), vec![2.0, 1.0, 1.0]);
    }

    #[test]
    fn select_keeps_flagged_samples_in_order() {
        let lc = LightCurve::from_columns(&[0.0, 1.0, 2.0, 3.0], &[1.0, 0.9, 0.8, 0.7], None)
            .unwrap();
        let kept = lc.select(&[false, true, false, true]);
        assert_eq!(kept.times(), vec![1.0, 3.0]);
        assert_eq!(kept.fluxes(), vec![0.9, 0.7]);
        assert!(lc.select(&[false; 4]).is_empty());
    }

    #[test]
    fn median_cadence_ignores_repeated_timestamps() {
        let lc = LightCurve::from_columns(&[0.0, 0.1, 0.1, 0.2, 0.3], &[1.0; 5], None).unwrap();
        assert_relative_eq!(lc.median_cadence().unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn box_model_marks_transit_window() {
        let candidate = TransitCandidate {
            period: 5.0,
            epoch: 2.5,
            duration: 0.2,
            depth: 0.01,
            power: 1.0,
            baseline: 1.0,
            depth_snr: 10.0,
            in_transit_count: 10,
        };
        let model = candidate.box_model(&[2.5, 2.65, 7.45, 12.0]);
        assert_relative_eq!(model[0], 0.99);
        assert_relative_eq!(model[1], 1.0);
        assert_relative_eq!(model[2], 0.99);
        assert_relative_eq!(model[3], 1.0);
    }

    #[test]
    fn bin_skips_empty_bins() {
        let samples = vec![
            FoldedSample {
                phase: -0.45,
                time: 0.0,
                flux: 1.0,
                flux_err: None,
            },
            FoldedSample {
                phase: -0.42,
                time: 1.0,
                flux: 0.98,
                flux_err: None,
            },
            FoldedSample {
                phase: 0.3,
                time: 2.0,
                flux: 1.0,
                flux_err: None,
            },
        ];
        let folded = FoldedLightCurve::from_sorted(1.0, 0.0, samples);
        let bins = folded.bin(10);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].count, 2);
        assert_relative_eq!(bins[0].flux, 0.99, epsilon = 1e-12);
        assert_relative_eq!(bins[0].phase, -0.45, epsilon = 1e-12);
    }
}
