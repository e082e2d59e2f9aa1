//! Phase folding on a candidate ephemeris.
use crate::error::{Result, TransitError};
use crate::types::{FoldedLightCurve, FoldedSample, LightCurve};

/// Fold `lc` on `period` so that `epoch` lands at phase zero.
///
/// Phases lie in `[-0.5, 0.5)` and the result is sorted by ascending phase
/// (ties keep time order).
pub fn fold(lc: &LightCurve, period: f64, epoch: f64) -> Result<FoldedLightCurve> {
    check_ephemeris(period, epoch)?;
    let mut samples: Vec<FoldedSample> = lc
        .iter()
        .map(|s| FoldedSample {
            phase: phase_of(s.time, period, epoch),
            time: s.time,
            flux: s.flux,
            flux_err: s.flux_err,
        })
        .collect();
    samples.sort_by(|a, b| a.phase.total_cmp(&b.phase).then(a.time.total_cmp(&b.time)));
    Ok(FoldedLightCurve::from_sorted(period, epoch, samples))
}

/// Per-sample flag telling whether it falls within `duration / 2` of a
/// predicted mid-transit time.
pub fn transit_mask(lc: &LightCurve, period: f64, epoch: f64, duration: f64) -> Result<Vec<bool>> {
    check_ephemeris(period, epoch)?;
    if !(duration.is_finite() && duration > 0.0) {
        return Err(TransitError::config(format!(
            "duration must be finite and positive, got {duration}"
        )));
    }
    let half = 0.5 * duration / period;
    Ok(lc
        .iter()
        .map(|s| phase_of(s.time, period, epoch).abs() < half)
        .collect())
}

fn check_ephemeris(period: f64, epoch: f64) -> Result<()> {
    if !(period.is_finite() && period > 0.0) {
        return Err(TransitError::config(format!(
            "period must be finite and positive, got {period}"
        )));
    }
    if !epoch.is_finite() {
        return Err(TransitError::config(format!("epoch must be finite, got {epoch}")));
    }
    Ok(())
}

fn phase_of(time: f64, period: f64, epoch: f64) -> f64 {
    let phase = ((time - epoch) / period + 0.5).rem_euclid(1.0) - 0.5;
    // rem_euclid may round up to exactly 1.0
    if phase >= 0.5 {
        phase - 1.0
    } else {
        phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sample;
    use approx::assert_relative_eq;

    fn ramp(n: usize) -> LightCurve {
        (0..n)
            .map(|i| Sample::new(i as f64 * 0.1, 1.0 + i as f64 * 1e-4))
            .collect()
    }

    #[test]
    fn phases_are_in_range_and_sorted() {
        let folded = fold(&ramp(500), 2.3, 0.7).unwrap();
        assert_eq!(folded.len(), 500);
        let phases = folded.phases();
        assert!(phases.iter().all(|p| (-0.5..0.5).contains(p)));
        assert!(phases.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn epoch_maps_to_phase_zero() {
        let lc: LightCurve = [2.0, 7.0, 12.0].iter().map(|&t| Sample::new(t, 1.0)).collect();
        let folded = fold(&lc, 5.0, 2.0).unwrap();
        for p in folded.phases() {
            assert_relative_eq!(p, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn half_phase_wraps_to_negative_half() {
        let lc: LightCurve = [2.5].iter().map(|&t| Sample::new(t, 1.0)).collect();
        let folded = fold(&lc, 1.0, 0.0).unwrap();
        assert_relative_eq!(folded.phases()[0], -0.5);
    }

    #[test]
    fn transit_mask_flags_window() {
        let lc: LightCurve = [0.0, 0.04, 0.06, 1.0, 2.97]
            .iter()
            .map(|&t| Sample::new(t, 1.0))
            .collect();
        let mask = transit_mask(&lc, 3.0, 0.0, 0.1).unwrap();
        assert_eq!(mask, vec![true, true, false, false, true]);
    }

    #[test]
    fn invalid_ephemeris_is_config_error() {
        let lc = ramp(10);
        assert!(fold(&lc, 0.0, 0.0).unwrap_err().is_config());
        assert!(fold(&lc, f64::NAN, 0.0).unwrap_err().is_config());
        assert!(fold(&lc, 1.0, f64::INFINITY).unwrap_err().is_config());
        assert!(transit_mask(&lc, 1.0, 0.0, -0.1).unwrap_err().is_config());
    }
}
