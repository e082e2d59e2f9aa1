use super::SearchParams;
use crate::bls::{self, Periodogram};
use crate::clean;
use crate::detrend;
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{InputDescriptor, PipelineTrace, TimingBreakdown};
use crate::error::Result;
use crate::fold;
use crate::types::{FoldedLightCurve, LightCurve, TransitCandidate};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything a run produced: the candidate plus the intermediate curves
/// needed to plot or audit it.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub candidate: TransitCandidate,
    /// Cleaned and flattened light curve that was searched.
    pub detrended: LightCurve,
    /// Trend divided out of the cleaned curve, aligned with `detrended`.
    pub trend: Vec<f64>,
    pub periodogram: Periodogram,
    /// `detrended` folded on the candidate ephemeris.
    pub folded: FoldedLightCurve,
    pub trace: PipelineTrace,
}

impl SearchReport {
    /// Print a human-readable summary to stdout.
    pub fn print_text_summary(&self) {
        let c = &self.candidate;
        let trace = &self.trace;
        println!("Transit candidate");
        println!("  period:   {:.6} d", c.period);
        println!("  epoch:    {:.6} d", c.epoch);
        println!("  duration: {:.4} d", c.duration);
        println!("  depth:    {:.6} ({:.1} ppm)", c.depth, c.depth * 1e6);
        println!("  power:    {:.6e}", c.power);
        println!("  depth_snr: {:.2} in_transit={}", c.depth_snr, c.in_transit_count);

        println!(
            "\nInput: samples={} span={:.3} d flux_errors={}",
            trace.input.samples, trace.input.time_span_days, trace.input.has_flux_errors
        );
        println!(
            "Clean: kept={}/{} non_finite={} duplicates={} outliers={} iters={} converged={}",
            trace.clean.output_samples,
            trace.clean.input_samples,
            trace.clean.non_finite_removed,
            trace.clean.duplicates_removed,
            trace.clean.outliers_removed,
            trace.clean.iterations,
            trace.clean.converged
        );
        println!(
            "Detrend: window={} polyorder={} segments={} masked={}",
            trace.detrend.window_length,
            trace.detrend.polyorder,
            trace.detrend.segments,
            trace.detrend.masked_samples
        );
        println!(
            "BLS: periods={} [{:.3}, {:.3}] durations={} fitted={} objective={:?} weighted={}",
            trace.bls.periods,
            trace.bls.min_period,
            trace.bls.max_period,
            trace.bls.durations,
            trace.bls.fitted_periods,
            trace.bls.objective,
            trace.bls.weighted
        );

        let stages: Vec<String> = trace
            .timings
            .stages
            .iter()
            .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
            .collect();
        println!(
            "\nTimings (ms): {} total={:.3}",
            stages.join(" "),
            trace.timings.total_ms
        );
    }
}

/// Clean → detrend → BLS → peak → fold, configured once and reusable.
///
/// ```no_run
/// use transit_search::{SearchParams, TransitSearch};
/// use transit_search::types::LightCurve;
///
/// # fn example(lc: LightCurve) -> transit_search::Result<()> {
/// let search = TransitSearch::new(SearchParams::default());
/// let candidate = search.run(&lc)?;
/// println!("P = {:.4} d, depth = {:.5}", candidate.period, candidate.depth);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct TransitSearch {
    params: SearchParams,
}

impl TransitSearch {
    pub fn new(params: SearchParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Run the full pipeline and return the best candidate.
    pub fn run(&self, lc: &LightCurve) -> Result<TransitCandidate> {
        self.run_with_diagnostics(lc).map(|report| report.candidate)
    }

    /// Run the full pipeline and keep every intermediate product.
    pub fn run_with_diagnostics(&self, lc: &LightCurve) -> Result<SearchReport> {
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let input = InputDescriptor::from_light_curve(lc);

        // The grid is checked first so a bad configuration fails before any work.
        let grid = self.params.grid.build()?;

        let cleaned = clean::clean_detailed(lc, &self.params.clean)?;
        timings.push("clean", cleaned.stage.elapsed_ms);

        let flattened = detrend::detrend_detailed(&cleaned.light_curve, &self.params.detrend)?;
        timings.push("detrend", flattened.stage.elapsed_ms);

        let searched = bls::search_detailed(&flattened.light_curve, &grid, &self.params.bls)?;
        timings.push("bls", searched.stage.elapsed_ms);

        let peak_start = Instant::now();
        let candidate = bls::select(&searched.periodogram)?;
        timings.push("peak", elapsed_ms(peak_start));

        let fold_start = Instant::now();
        let folded = fold::fold(&flattened.light_curve, candidate.period, candidate.epoch)?;
        timings.push("fold", elapsed_ms(fold_start));

        timings.finish(total_start);
        info!(
            "search: period={:.6} epoch={:.6} depth={:.6} duration={:.4} total_ms={:.3}",
            candidate.period, candidate.epoch, candidate.depth, candidate.duration, timings.total_ms
        );
        debug!(
            "search: kept {}/{} samples, {} of {} periods fitted",
            cleaned.stage.output_samples,
            cleaned.stage.input_samples,
            searched.stage.fitted_periods,
            searched.stage.periods
        );

        Ok(SearchReport {
            candidate,
            detrended: flattened.light_curve,
            trend: flattened.trend,
            periodogram: searched.periodogram,
            folded,
            trace: PipelineTrace {
                input,
                timings,
                clean: cleaned.stage,
                detrend: flattened.stage,
                bls: searched.stage,
            },
        })
    }
}
