//! Removal of invalid samples and flux outliers.
//!
//! Cleaning runs in three passes over a copy of the input:
//! 1. samples with a non-finite time or flux are dropped (a bad `flux_err`
//!    only loses the error, not the sample);
//! 2. the series is stably sorted by time and repeated timestamps keep their
//!    first occurrence;
//! 3. iterative sigma clipping around the median flux, recomputing the centre
//!    and scale on the retained set until a round removes nothing or
//!    [`CleanOptions::max_iters`] is reached.
//!
//! Running the cleaner twice is a no-op on the second pass whenever the first
//! pass converged (see [`CleanStage::converged`]).

mod options;

pub use options::{CleanOptions, ScaleEstimator};

use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::CleanStage;
use crate::error::{Result, TransitError};
use crate::stats;
use crate::types::{LightCurve, Sample};
use log::debug;
use std::time::Instant;

/// Cleaned light curve together with the stage report.
#[derive(Clone, Debug)]
pub struct CleanOutput {
    pub light_curve: LightCurve,
    pub stage: CleanStage,
}

/// Clean `lc`, returning a new light curve with finite, unique, non-outlying
/// samples.
pub fn clean(lc: &LightCurve, opts: &CleanOptions) -> Result<LightCurve> {
    clean_detailed(lc, opts).map(|out| out.light_curve)
}

/// Same as [`clean`] but also reports what each pass removed.
pub fn clean_detailed(lc: &LightCurve, opts: &CleanOptions) -> Result<CleanOutput> {
    validate(opts)?;
    if lc.is_empty() {
        return Err(TransitError::data("light curve is empty"));
    }
    let start = Instant::now();
    let input_samples = lc.len();

    let mut kept: Vec<Sample> = lc
        .iter()
        .filter(|s| s.time.is_finite() && s.flux.is_finite())
        .map(|s| Sample {
            time: s.time,
            flux: s.flux,
            flux_err: s.flux_err.filter(|e| e.is_finite() && *e > 0.0),
        })
        .collect();
    let non_finite_removed = input_samples - kept.len();
    if kept.is_empty() {
        return Err(TransitError::data(format!(
            "all {input_samples} samples have non-finite time or flux"
        )));
    }

    kept.sort_by(|a, b| a.time.total_cmp(&b.time));
    let before_dedup = kept.len();
    kept.dedup_by(|later, earlier| later.time == earlier.time);
    let duplicates_removed = before_dedup - kept.len();

    let before_clip = kept.len();
    let clip = sigma_clip(&mut kept, opts);
    let outliers_removed = before_clip - kept.len();
    if kept.is_empty() {
        return Err(TransitError::data("sigma clipping rejected every sample"));
    }

    debug!(
        "clean: in={} non_finite={} duplicates={} outliers={} iters={} converged={}",
        input_samples,
        non_finite_removed,
        duplicates_removed,
        outliers_removed,
        clip.iterations,
        clip.converged
    );

    let stage = CleanStage {
        input_samples,
        output_samples: kept.len(),
        non_finite_removed,
        duplicates_removed,
        outliers_removed,
        iterations: clip.iterations,
        converged: clip.converged,
        center: clip.center,
        scale: clip.scale,
        elapsed_ms: elapsed_ms(start),
    };
    Ok(CleanOutput {
        light_curve: LightCurve::new(kept),
        stage,
    })
}

fn validate(opts: &CleanOptions) -> Result<()> {
    let thresholds = [
        ("sigma", opts.sigma),
        ("sigma_lower", opts.lower_threshold()),
        ("sigma_upper", opts.upper_threshold()),
    ];
    for (name, value) in thresholds {
        if value.is_nan() || value <= 0.0 {
            return Err(TransitError::config(format!(
                "{name} must be positive, got {value}"
            )));
        }
    }
    if opts.max_iters == 0 {
        return Err(TransitError::config("max_iters must be at least 1"));
    }
    Ok(())
}

struct ClipSummary {
    iterations: usize,
    converged: bool,
    center: f64,
    scale: f64,
}

fn sigma_clip(samples: &mut Vec<Sample>, opts: &CleanOptions) -> ClipSummary {
    let lower = opts.lower_threshold();
    let upper = opts.upper_threshold();
    let mut summary = ClipSummary {
        iterations: 0,
        converged: false,
        center: f64::NAN,
        scale: f64::NAN,
    };

    while summary.iterations < opts.max_iters && !samples.is_empty() {
        let flux: Vec<f64> = samples.iter().map(|s| s.flux).collect();
        let Some(center) = stats::median(&flux) else {
            break;
        };
        let scale = match opts.scale {
            ScaleEstimator::StdDev => stats::mean_and_stddev(&flux).1,
            ScaleEstimator::MadStd => stats::mad_std(&flux, center),
        };
        summary.iterations += 1;
        summary.center = center;
        summary.scale = scale;

        if !(scale.is_finite() && scale > 0.0) {
            summary.converged = true;
            break;
        }

        let before = samples.len();
        samples.retain(|s| {
            let dev = s.flux - center;
            dev <= upper * scale && -dev <= lower * scale
        });
        if samples.len() == before {
            summary.converged = true;
            break;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_with(values: &[(usize, f64)], n: usize) -> LightCurve {
        let mut flux: Vec<f64> = (0..n)
            .map(|i| 1.0 + 1e-3 * ((i * 7919 % 13) as f64 - 6.0) / 6.0)
            .collect();
        for &(idx, v) in values {
            flux[idx] = v;
        }
        let time: Vec<f64> = (0..n).map(|i| i as f64 * 0.02).collect();
        LightCurve::from_columns(&time, &flux, None).unwrap()
    }

    #[test]
    fn drops_non_finite_and_outliers() {
        let lc = flat_with(&[(10, f64::NAN), (20, 1.5), (30, 0.5), (40, f64::INFINITY)], 200);
        let out = clean_detailed(&lc, &CleanOptions::default()).unwrap();
        assert_eq!(out.stage.non_finite_removed, 2);
        assert_eq!(out.stage.outliers_removed, 2);
        assert_eq!(out.light_curve.len(), 196);
        assert!(out.stage.converged);
        assert!(out
            .light_curve
            .iter()
            .all(|s| s.flux.is_finite() && (s.flux - 1.0).abs() < 0.01));
    }

    #[test]
    fn upper_only_keeps_dips() {
        let lc = flat_with(&[(20, 1.5), (30, 0.5)], 200);
        let out = clean(&lc, &CleanOptions::upper_only(5.0)).unwrap();
        assert_eq!(out.len(), 199);
        assert!(out.iter().any(|s| s.flux == 0.5));
    }

    #[test]
    fn sorts_and_removes_duplicate_timestamps() {
        let lc = LightCurve::new(vec![
            Sample::new(2.0, 1.0),
            Sample::new(1.0, 1.0),
            Sample::new(2.0, 0.9),
            Sample::new(0.0, 1.0),
        ]);
        let out = clean_detailed(&lc, &CleanOptions::default()).unwrap();
        assert_eq!(out.stage.duplicates_removed, 1);
        assert_eq!(out.light_curve.times(), vec![0.0, 1.0, 2.0]);
        // first occurrence of t=2.0 wins
        assert_eq!(out.light_curve.samples()[2].flux, 1.0);
    }

    #[test]
    fn invalid_flux_error_is_dropped_not_the_sample() {
        let lc = LightCurve::new(vec![
            Sample::with_error(0.0, 1.0, f64::NAN),
            Sample::with_error(1.0, 1.0, 0.01),
        ]);
        let out = clean(&lc, &CleanOptions::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.samples()[0].flux_err, None);
        assert_eq!(out.samples()[1].flux_err, Some(0.01));
    }

    #[test]
    fn constant_flux_is_left_alone() {
        let lc = LightCurve::from_columns(&[0.0, 1.0, 2.0], &[1.0, 1.0, 1.0], None).unwrap();
        let out = clean_detailed(&lc, &CleanOptions::default()).unwrap();
        assert_eq!(out.light_curve.len(), 3);
        assert_eq!(out.stage.scale, 0.0);
    }

    #[test]
    fn empty_and_all_nan_inputs_are_data_errors() {
        let empty = LightCurve::default();
        assert!(clean(&empty, &CleanOptions::default()).unwrap_err().is_data());

        let nan = LightCurve::from_columns(&[0.0, 1.0, 2.0], &[f64::NAN; 3], None).unwrap();
        assert!(clean(&nan, &CleanOptions::default()).unwrap_err().is_data());
    }

    #[test]
    fn rejects_non_positive_thresholds() {
        let lc = flat_with(&[], 10);
        let opts = CleanOptions {
            sigma: 0.0,
            ..CleanOptions::default()
        };
        assert!(clean(&lc, &opts).unwrap_err().is_config());
        let opts = CleanOptions {
            max_iters: 0,
            ..CleanOptions::default()
        };
        assert!(clean(&lc, &opts).unwrap_err().is_config());
    }

    #[test]
    fn mad_scale_clips_moderate_outliers() {
        let lc = flat_with(&[(50, 1.01)], 200);
        let std_out = clean(&lc, &CleanOptions::default()).unwrap();
        let mad_out = clean(
            &lc,
            &CleanOptions::default().with_scale(ScaleEstimator::MadStd),
        )
        .unwrap();
        assert!(mad_out.len() <= std_out.len());
        assert!(mad_out.iter().all(|s| s.flux < 1.005));
    }
}
