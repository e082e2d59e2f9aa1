use super::{BlsOptions, BoxFit, Objective, Periodogram, TrialGrid};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::BlsStage;
use crate::error::{Result, TransitError};
use crate::stats;
use crate::types::LightCurve;
use log::debug;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Periodogram together with the stage report.
#[derive(Clone, Debug)]
pub struct BlsOutput {
    pub periodogram: Periodogram,
    pub stage: BlsStage,
}

/// Run the box-least-squares search of `lc` over `grid`.
pub fn search(lc: &LightCurve, grid: &TrialGrid, opts: &BlsOptions) -> Result<Periodogram> {
    search_detailed(lc, grid, opts).map(|out| out.periodogram)
}

/// Same as [`search`] but also returns the stage report.
pub fn search_detailed(
    lc: &LightCurve,
    grid: &TrialGrid,
    opts: &BlsOptions,
) -> Result<BlsOutput> {
    grid.validate()?;
    if lc.is_empty() {
        return Err(TransitError::data("cannot search an empty light curve"));
    }
    if let Some(s) = lc
        .iter()
        .find(|s| !(s.time.is_finite() && s.flux.is_finite()))
    {
        return Err(TransitError::data(format!(
            "non-finite sample (t={}, flux={}); clean the light curve first",
            s.time, s.flux
        )));
    }
    let start = Instant::now();

    let series = WeightedSeries::from_light_curve(lc);
    let objective = opts.objective;
    let eval = |&period: &f64| best_box(&series, period, &grid.durations, objective);

    #[cfg(feature = "parallel")]
    let rows: Vec<Option<(f64, BoxFit)>> = grid.periods.par_iter().map(eval).collect();
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Option<(f64, BoxFit)>> = grid.periods.iter().map(eval).collect();

    let periodogram = Periodogram {
        periods: grid.periods.clone(),
        power: rows.iter().map(|r| r.map_or(0.0, |(p, _)| p)).collect(),
        fits: rows.iter().map(|r| r.map(|(_, f)| f)).collect(),
    };
    let fitted_periods = periodogram.fitted_rows();

    let stage = BlsStage {
        periods: grid.periods.len(),
        durations: grid.durations.len(),
        min_period: grid.periods[0],
        max_period: grid.periods[grid.periods.len() - 1],
        objective,
        weighted: series.weighted,
        fitted_periods,
        parallel: cfg!(feature = "parallel"),
        elapsed_ms: elapsed_ms(start),
    };
    debug!(
        "bls: n={} periods={} durations={} fitted={} weighted={} elapsed_ms={:.3}",
        lc.len(),
        stage.periods,
        stage.durations,
        fitted_periods,
        stage.weighted,
        stage.elapsed_ms
    );

    Ok(BlsOutput { periodogram, stage })
}

/// Flux centred on its weighted mean together with the per-sample weights.
struct WeightedSeries {
    t_ref: f64,
    times: Vec<f64>,
    /// `w_i * (y_i - ybar)`.
    weighted_flux: Vec<f64>,
    weights: Vec<f64>,
    total_weight: f64,
    mean: f64,
    weighted: bool,
}

impl WeightedSeries {
    fn from_light_curve(lc: &LightCurve) -> Self {
        let times = lc.times();
        let flux = lc.fluxes();
        let t_ref = times.iter().copied().fold(f64::INFINITY, f64::min);

        let errors = lc
            .flux_errors()
            .filter(|errs| errs.iter().all(|e| e.is_finite() && *e > 0.0));
        let weighted = errors.is_some();
        let weights: Vec<f64> = match errors {
            Some(errs) => errs.iter().map(|e| 1.0 / (e * e)).collect(),
            None => {
                let (_, std) = stats::mean_and_stddev(&flux);
                let scale = if std > 0.0 { std } else { 1.0 };
                vec![1.0 / (scale * scale); flux.len()]
            }
        };

        let total_weight: f64 = weights.iter().sum();
        let mean = weights.iter().zip(&flux).map(|(w, y)| w * y).sum::<f64>() / total_weight;
        let weighted_flux = weights
            .iter()
            .zip(&flux)
            .map(|(w, y)| w * (y - mean))
            .collect();

        Self {
            t_ref,
            times,
            weighted_flux,
            weights,
            total_weight,
            mean,
            weighted,
        }
    }
}

/// Phase-sorted samples of one trial period with cumulative sums over the
/// sequence repeated twice, so a window may wrap past phase 1.
struct PhaseFold {
    /// Phases in `[0, 2)`; the second half repeats the first shifted by one.
    phase: Vec<f64>,
    cum_w: Vec<f64>,
    cum_wy: Vec<f64>,
}

impl PhaseFold {
    fn new(series: &WeightedSeries, period: f64) -> Self {
        let n = series.times.len();
        let mut order: Vec<(f64, usize)> = series
            .times
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut phase = ((t - series.t_ref) / period).rem_euclid(1.0);
                if phase >= 1.0 {
                    phase = 0.0;
                }
                (phase, i)
            })
            .collect();
        order.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut phase = Vec::with_capacity(2 * n);
        let mut cum_w = Vec::with_capacity(2 * n + 1);
        let mut cum_wy = Vec::with_capacity(2 * n + 1);
        cum_w.push(0.0);
        cum_wy.push(0.0);
        for lap in 0..2 {
            for &(ph, i) in &order {
                phase.push(ph + lap as f64);
                cum_w.push(cum_w[cum_w.len() - 1] + series.weights[i]);
                cum_wy.push(cum_wy[cum_wy.len() - 1] + series.weighted_flux[i]);
            }
        }
        Self {
            phase,
            cum_w,
            cum_wy,
        }
    }
}

/// Maximise the objective over every duration and every distinct in-box
/// sample set. Returns `None` when no window shows a dip.
///
/// Sample `k` lies in `[x, x + q)` exactly when `φ_k - q < x <= φ_k`, so the
/// in-box set only changes as `x` passes some `φ_k` or `φ_k - q`. Evaluating
/// the windows starting at every `φ_k` and ending at every `φ_k` therefore
/// visits each attainable partition.
fn best_box(
    series: &WeightedSeries,
    period: f64,
    durations: &[f64],
    objective: Objective,
) -> Option<(f64, BoxFit)> {
    let n = series.times.len();
    let fold = PhaseFold::new(series, period);
    let mut best: Option<(f64, BoxFit)> = None;

    for &duration in durations {
        let q = duration / period;

        // [φ_s, φ_s + q)
        let mut end = 0;
        for start in 0..n {
            let limit = fold.phase[start] + q;
            end = end.max(start + 1);
            while end < start + n && fold.phase[end] < limit {
                end += 1;
            }
            let mid_phase = fold.phase[start] + 0.5 * q;
            let window = Window { start, end, mid_phase };
            consider(series, &fold, window, period, duration, objective, &mut best);
        }

        // [φ_i - q, φ_i)
        let mut start = 1;
        for stop in n..2 * n {
            let limit = fold.phase[stop] - q;
            start = start.max(stop + 1 - n);
            while start < stop && fold.phase[start] < limit {
                start += 1;
            }
            let mid_phase = fold.phase[stop] - 0.5 * q;
            let window = Window { start, end: stop, mid_phase };
            consider(series, &fold, window, period, duration, objective, &mut best);
        }
    }
    best
}

/// Samples `start..end` of a [`PhaseFold`] and the phase of the box centre.
#[derive(Clone, Copy)]
struct Window {
    start: usize,
    end: usize,
    mid_phase: f64,
}

/// Score one window and keep it in `best` when it beats the current maximum.
fn consider(
    series: &WeightedSeries,
    fold: &PhaseFold,
    window: Window,
    period: f64,
    duration: f64,
    objective: Objective,
    best: &mut Option<(f64, BoxFit)>,
) {
    let n = series.times.len();
    let total_w = series.total_weight;
    let Window { start, end, mid_phase } = window;

    let w_in = fold.cum_w[end] - fold.cum_w[start];
    let w_out = total_w - w_in;
    if end - start >= n || w_in <= 0.0 || w_out <= 0.0 {
        return;
    }
    let wy_in = fold.cum_wy[end] - fold.cum_wy[start];
    // flux is centred, so the out-of-box sum is the negated in-box sum
    let mean_in = wy_in / w_in;
    let mean_out = -wy_in / w_out;
    let depth = mean_out - mean_in;
    if !(depth > 0.0) {
        return;
    }

    let depth_snr = depth * (w_in * w_out / total_w).sqrt();
    let value = match objective {
        Objective::Likelihood => 0.5 * w_in * w_out / total_w * depth * depth,
        Objective::Snr => depth_snr,
    };
    if matches!(*best, Some((b, _)) if value <= b) {
        return;
    }
    let mut epoch = series.t_ref + mid_phase.rem_euclid(1.0) * period;
    if epoch >= series.t_ref + period {
        epoch = series.t_ref;
    }
    *best = Some((
        value,
        BoxFit {
            duration,
            epoch,
            depth,
            baseline: mean_out + series.mean,
            depth_snr,
            in_transit_count: end - start,
        },
    ));
}
