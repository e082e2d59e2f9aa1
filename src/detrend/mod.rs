//! Removal of slow stellar variability with a sliding local-polynomial filter.
//!
//! The trend at every sample is the value of a low-order polynomial fitted by
//! least squares to the `window_length` samples around it (Savitzky–Golay
//! style, but evaluated on the real timestamps so small cadence jitter does
//! not bias the fit). Close to either end of a segment the window is shifted
//! inward instead of truncated. The flux is then divided by the trend.
//!
//! Two refinements keep short transits intact:
//! - the series is split at gaps longer than `break_tolerance` cadences and
//!   every segment is filtered on its own;
//! - a running median over the same window seeds a mask of samples whose
//!   residual deviates by more than `mask_sigma` standard deviations. Each
//!   polynomial fit then uses the `window_length` unmasked samples nearest in
//!   time, so a dip is bridged by the baseline around it instead of dragging
//!   the trend down. The mask is re-derived after every fit.

mod options;
mod poly;

pub use options::{DetrendOptions, FALLBACK_WINDOW_LENGTH};

use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::DetrendStage;
use crate::error::{Result, TransitError};
use crate::stats;
use crate::types::{LightCurve, Sample};
use log::debug;
use poly::local_poly_value;
use std::ops::Range;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Flattened light curve, the trend that was divided out, and the report.
#[derive(Clone, Debug)]
pub struct DetrendOutput {
    pub light_curve: LightCurve,
    /// Trend value per sample, aligned with the input.
    pub trend: Vec<f64>,
    pub stage: DetrendStage,
}

/// Divide out the slow trend of `lc`.
pub fn detrend(lc: &LightCurve, opts: &DetrendOptions) -> Result<LightCurve> {
    detrend_detailed(lc, opts).map(|out| out.light_curve)
}

/// Same as [`detrend`] but also returns the trend and the stage report.
pub fn detrend_detailed(lc: &LightCurve, opts: &DetrendOptions) -> Result<DetrendOutput> {
    validate(opts)?;
    if lc.is_empty() {
        return Err(TransitError::data("cannot detrend an empty light curve"));
    }
    let start = Instant::now();

    let (window_length, cadence) = window_length(lc, opts.window_days);
    let times = lc.times();
    let flux = lc.fluxes();
    let segments = split_segments(&times, cadence, opts.break_tolerance);
    debug!(
        "detrend: n={} window_length={} cadence={:?} segments={}",
        lc.len(),
        window_length,
        cadence,
        segments.len()
    );

    let median_trend = running_median(&flux, &segments, window_length);
    let mut mask = residual_mask(&flux, &median_trend, opts.mask_sigma);
    let mut trend = median_trend;
    for iter in 0..opts.niters {
        trend = fit_trend(&times, &flux, &mask, &segments, window_length, opts.polyorder);
        let next = residual_mask(&flux, &trend, opts.mask_sigma);
        debug!(
            "detrend: fit {} masked={}",
            iter + 1,
            next.iter().filter(|m| !**m).count()
        );
        if next == mask {
            break;
        }
        mask = next;
    }

    if let Some((idx, value)) = trend
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v > 0.0))
    {
        return Err(TransitError::data(format!(
            "trend value {value} at t={} is not positive; flux must be normalised near 1.0",
            times[idx]
        )));
    }

    let samples = lc
        .iter()
        .zip(&trend)
        .map(|(s, &tr)| Sample {
            time: s.time,
            flux: s.flux / tr,
            flux_err: s.flux_err.map(|e| e / tr),
        })
        .collect();

    let stage = DetrendStage {
        window_length,
        cadence_days: cadence,
        polyorder: opts.polyorder,
        segments: segments.len(),
        masked_samples: mask.iter().filter(|m| !**m).count(),
        elapsed_ms: elapsed_ms(start),
    };
    Ok(DetrendOutput {
        light_curve: LightCurve::new(samples),
        trend,
        stage,
    })
}

/// Convert a window in days into an odd sample count (at least 3), capped at
/// the number of samples.
///
/// Returns the fallback length and no cadence when the series has fewer than
/// two distinct timestamps.
pub fn window_length(lc: &LightCurve, window_days: f64) -> (usize, Option<f64>) {
    if lc.len() < 2 {
        return (FALLBACK_WINDOW_LENGTH, None);
    }
    let Some(cadence) = lc.median_cadence() else {
        return (FALLBACK_WINDOW_LENGTH, None);
    };
    let n = lc.len();
    let mut length = ((window_days / cadence).round() as usize).min(n);
    if length % 2 == 0 {
        length = if length < n { length + 1 } else { length - 1 };
    }
    (length.max(3), Some(cadence))
}

fn validate(opts: &DetrendOptions) -> Result<()> {
    if !(opts.window_days.is_finite() && opts.window_days > 0.0) {
        return Err(TransitError::config(format!(
            "window_days must be positive, got {}",
            opts.window_days
        )));
    }
    if opts.polyorder < 2 {
        return Err(TransitError::config(format!(
            "polyorder must be at least 2, got {}",
            opts.polyorder
        )));
    }
    if opts.break_tolerance.is_nan() || opts.break_tolerance <= 0.0 {
        return Err(TransitError::config(format!(
            "break_tolerance must be positive, got {}",
            opts.break_tolerance
        )));
    }
    if opts.niters == 0 {
        return Err(TransitError::config("niters must be at least 1"));
    }
    if opts.mask_sigma.is_nan() || opts.mask_sigma <= 0.0 {
        return Err(TransitError::config(format!(
            "mask_sigma must be positive, got {}",
            opts.mask_sigma
        )));
    }
    Ok(())
}

fn split_segments(times: &[f64], cadence: Option<f64>, break_tolerance: f64) -> Vec<Range<usize>> {
    let Some(cadence) = cadence else {
        return vec![0..times.len()];
    };
    let max_gap = break_tolerance * cadence;
    let mut segments = Vec::new();
    let mut seg_start = 0;
    for i in 1..times.len() {
        if times[i] - times[i - 1] > max_gap {
            segments.push(seg_start..i);
            seg_start = i;
        }
    }
    segments.push(seg_start..times.len());
    segments
}

/// Window of `length` samples centred on `i`, shifted to stay inside `segment`.
fn window_for(i: usize, segment: &Range<usize>, length: usize) -> Range<usize> {
    let length = length.min(segment.len());
    let half = length / 2;
    let start = i
        .saturating_sub(half)
        .max(segment.start)
        .min(segment.end - length);
    start..start + length
}

/// Indices of the `length` unmasked samples of `segment` nearest in time to
/// `i`, in increasing order. Falls back to the plain centred window when the
/// segment has too few unmasked samples for a fit of `degree`.
fn unmasked_window(
    i: usize,
    times: &[f64],
    mask: &[bool],
    segment: &Range<usize>,
    length: usize,
    degree: usize,
) -> Vec<usize> {
    let length = length.min(segment.len());
    let mut picked = Vec::with_capacity(length);
    if mask[i] {
        picked.push(i);
    }
    let (mut lo, mut hi) = (i, i + 1);
    while picked.len() < length && (lo > segment.start || hi < segment.end) {
        let take_low = hi >= segment.end
            || (lo > segment.start && times[i] - times[lo - 1] <= times[hi] - times[i]);
        let j = if take_low {
            lo -= 1;
            lo
        } else {
            hi += 1;
            hi - 1
        };
        if mask[j] {
            picked.push(j);
        }
    }
    if picked.len() <= degree {
        return window_for(i, segment, length).collect();
    }
    picked.sort_unstable();
    picked
}

fn running_median(flux: &[f64], segments: &[Range<usize>], window_length: usize) -> Vec<f64> {
    let mut trend = Vec::with_capacity(flux.len());
    for segment in segments {
        trend.extend(segment.clone().map(|i| {
            let window = window_for(i, segment, window_length);
            stats::median(&flux[window]).unwrap_or(flux[i])
        }));
    }
    trend
}

fn fit_trend(
    times: &[f64],
    flux: &[f64],
    mask: &[bool],
    segments: &[Range<usize>],
    window_length: usize,
    degree: usize,
) -> Vec<f64> {
    let mut trend = Vec::with_capacity(flux.len());
    for segment in segments {
        let eval = |i: usize| {
            let window = unmasked_window(i, times, mask, segment, window_length, degree);
            local_poly_value(times, flux, &window, i, degree)
        };
        #[cfg(feature = "parallel")]
        let values: Vec<f64> = segment.clone().into_par_iter().map(eval).collect();
        #[cfg(not(feature = "parallel"))]
        let values: Vec<f64> = segment.clone().map(eval).collect();
        trend.extend(values);
    }
    trend
}

fn residual_mask(flux: &[f64], trend: &[f64], sigma: f64) -> Vec<bool> {
    let residuals: Vec<f64> = flux.iter().zip(trend).map(|(f, t)| f - t).collect();
    let center = stats::median(&residuals).unwrap_or(0.0);
    let (_, std) = stats::mean_and_stddev(&residuals);
    if !(std.is_finite() && std > 0.0) {
        return vec![true; flux.len()];
    }
    residuals
        .iter()
        .map(|r| (r - center).abs() <= sigma * std)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(n: usize, cadence: f64, f: impl Fn(f64) -> f64) -> LightCurve {
        let time: Vec<f64> = (0..n).map(|i| i as f64 * cadence).collect();
        let flux: Vec<f64> = time.iter().map(|&t| f(t)).collect();
        LightCurve::from_columns(&time, &flux, None).unwrap()
    }

    #[test]
    fn window_length_is_odd_and_floored() {
        let lc = series(100, 0.02, |_| 1.0);
        assert_eq!(window_length(&lc, 0.5).0, 25);
        assert_eq!(window_length(&lc, 0.4).0, 21);
        assert_eq!(window_length(&lc, 0.01).0, 3);
        let single = series(1, 0.02, |_| 1.0);
        assert_eq!(window_length(&single, 0.5), (FALLBACK_WINDOW_LENGTH, None));
    }

    #[test]
    fn window_length_is_capped_at_sample_count() {
        let odd = series(51, 0.02, |_| 1.0);
        assert_eq!(window_length(&odd, 1e300).0, 51);
        let even = series(50, 0.02, |_| 1.0);
        assert_eq!(window_length(&even, 1e300).0, 49);
        assert_eq!(window_length(&even, f64::MAX).0, 49);
    }

    #[test]
    fn window_longer_than_series_fits_whole_segment() {
        let lc = series(50, 0.02, |t| 1.0 + 0.01 * t);
        let opts = DetrendOptions::default().with_window_days(1e300);
        let out = detrend_detailed(&lc, &opts).unwrap();
        assert_eq!(out.light_curve.len(), 50);
        assert_eq!(out.stage.window_length, 49);
        for s in out.light_curve.iter() {
            assert_relative_eq!(s.flux, 1.0, epsilon = 1e-9);
        }
        let window = unmasked_window(10, &lc.times(), &[true; 50], &(0..50), usize::MAX, 2);
        assert_eq!(window, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn removes_slow_variability() {
        let lc = series(2000, 0.01, |t| 1.0 + 0.01 * (2.0 * std::f64::consts::PI * t / 5.0).sin());
        let flat = detrend(&lc, &DetrendOptions::default()).unwrap();
        for s in flat.iter() {
            assert_relative_eq!(s.flux, 1.0, epsilon = 5e-4);
        }
    }

    #[test]
    fn preserves_short_dip_depth() {
        let lc = series(1000, 0.02, |t| {
            let base = 1.0 + 0.005 * (t / 3.0).sin();
            if (t - 10.0).abs() < 0.1 {
                base * 0.99
            } else {
                base
            }
        });
        let out = detrend_detailed(&lc, &DetrendOptions::default()).unwrap();
        assert!(out.stage.masked_samples > 0);
        let in_dip: Vec<f64> = out
            .light_curve
            .iter()
            .filter(|s| (s.time - 10.0).abs() < 0.08)
            .map(|s| s.flux)
            .collect();
        assert!(!in_dip.is_empty());
        for f in in_dip {
            assert_relative_eq!(f, 0.99, epsilon = 5e-4);
        }
    }

    #[test]
    fn gaps_split_segments() {
        let mut time: Vec<f64> = (0..50).map(|i| i as f64 * 0.02).collect();
        time.extend((0..50).map(|i| 5.0 + i as f64 * 0.02));
        let flux: Vec<f64> = time.iter().map(|t| if *t < 5.0 { 1.0 } else { 1.2 }).collect();
        let lc = LightCurve::from_columns(&time, &flux, None).unwrap();
        let out = detrend_detailed(&lc, &DetrendOptions::default()).unwrap();
        assert_eq!(out.stage.segments, 2);
        for s in out.light_curve.iter() {
            assert_relative_eq!(s.flux, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn window_shifts_inward_at_edges() {
        let seg = 0..10;
        assert_eq!(window_for(0, &seg, 5), 0..5);
        assert_eq!(window_for(9, &seg, 5), 5..10);
        assert_eq!(window_for(4, &seg, 5), 2..7);
        assert_eq!(window_for(3, &seg, 25), 0..10);
    }

    #[test]
    fn unmasked_window_skips_masked_samples() {
        let times: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let mut mask = vec![true; 20];
        for m in &mut mask[8..12] {
            *m = false;
        }
        let window = unmasked_window(10, &times, &mask, &(0..20), 5, 2);
        assert_eq!(window, vec![6, 7, 12, 13, 14]);
        let edge = unmasked_window(0, &times, &mask, &(0..20), 5, 2);
        assert_eq!(edge, vec![0, 1, 2, 3, 4]);
        let none = vec![false; 20];
        assert_eq!(unmasked_window(3, &times, &none, &(0..20), 5, 2), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn non_positive_window_is_config_error() {
        let lc = series(10, 0.02, |_| 1.0);
        for w in [0.0, -1.0, f64::NAN] {
            let err = detrend(&lc, &DetrendOptions::default().with_window_days(w)).unwrap_err();
            assert!(err.is_config());
        }
    }

    #[test]
    fn negative_trend_is_data_error() {
        let lc = series(10, 0.02, |_| -1.0);
        assert!(detrend(&lc, &DetrendOptions::default()).unwrap_err().is_data());
    }
}
