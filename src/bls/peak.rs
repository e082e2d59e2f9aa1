use super::Periodogram;
use crate::error::{Result, TransitError};
use crate::types::TransitCandidate;
use log::debug;

/// Pick the strongest row of `periodogram` as the transit candidate.
///
/// The row with the highest power wins; equal powers resolve to the shortest
/// period. Rows without a box fit are never selected.
pub fn select(periodogram: &Periodogram) -> Result<TransitCandidate> {
    let n = periodogram.periods.len();
    if n == 0 {
        return Err(TransitError::data("periodogram is empty"));
    }
    if periodogram.power.len() != n || periodogram.fits.len() != n {
        return Err(TransitError::data(format!(
            "periodogram columns disagree in length: periods={} power={} fits={}",
            n,
            periodogram.power.len(),
            periodogram.fits.len()
        )));
    }

    let mut best: Option<usize> = None;
    for i in 0..n {
        if periodogram.fits[i].is_none() || !periodogram.power[i].is_finite() {
            continue;
        }
        best = match best {
            None => Some(i),
            Some(b) => {
                let (pi, pb) = (periodogram.power[i], periodogram.power[b]);
                if pi > pb || (pi == pb && periodogram.periods[i] < periodogram.periods[b]) {
                    Some(i)
                } else {
                    Some(b)
                }
            }
        };
    }

    let idx = best.ok_or_else(|| {
        TransitError::data("no trial period produced a transit-like dip")
    })?;
    let (period, power) = (periodogram.periods[idx], periodogram.power[idx]);
    let fit = periodogram.fits[idx]
        .ok_or_else(|| TransitError::data("selected row has no box fit"))?;
    debug!(
        "peak: index={} period={:.6} power={:.6e} depth={:.6e} duration={:.4}",
        idx, period, power, fit.depth, fit.duration
    );

    Ok(TransitCandidate {
        period,
        epoch: fit.epoch,
        duration: fit.duration,
        depth: fit.depth,
        power,
        baseline: fit.baseline,
        depth_snr: fit.depth_snr,
        in_transit_count: fit.in_transit_count,
    })
}
