#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod bls;
pub mod clean;
pub mod detrend;
pub mod diagnostics;
pub mod error;
pub mod fold;
pub mod search;
pub mod types;

// Tooling: demo data, JSON config and report output.
pub mod config;
pub mod io;
pub mod synthetic;

mod stats;

// --- High-level re-exports -------------------------------------------------

// Main entry points: the pipeline and its result.
pub use crate::error::{Result, TransitError};
pub use crate::search::{SearchParams, SearchReport, TransitSearch};
pub use crate::types::{FoldedLightCurve, LightCurve, Sample, TransitCandidate};

// Stage functions, usable on their own.
pub use crate::bls::{search as bls_search, select as select_peak, Periodogram, TrialGrid};
pub use crate::clean::clean;
pub use crate::detrend::detrend;
pub use crate::fold::{fold, transit_mask};

// High-level diagnostics returned by the pipeline.
pub use crate::diagnostics::PipelineTrace;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use transit_search::prelude::*;
///
/// # fn main() -> transit_search::Result<()> {
/// let lc = LightCurve::from_columns(&[0.0, 0.02, 0.04], &[1.0, 0.99, 1.0], None)?;
/// let search = TransitSearch::new(SearchParams::default());
/// let report = search.run_with_diagnostics(&lc)?;
/// println!("P={:.4} d depth={:.5}", report.candidate.period, report.candidate.depth);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::bls::{BlsOptions, GridOptions, Objective, TrialGrid};
    pub use crate::clean::CleanOptions;
    pub use crate::detrend::DetrendOptions;
    pub use crate::{LightCurve, Sample, SearchParams, TransitCandidate, TransitSearch};
}

// --- Stage-level diagnostics API (for tools & advanced users) --------------

pub mod stages {
    // Stage runners returning their diagnostics.
    pub use crate::bls::{search_detailed, BlsOutput};
    pub use crate::clean::{clean_detailed, CleanOutput};
    pub use crate::detrend::{detrend_detailed, window_length, DetrendOutput};

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        BlsStage, CleanStage, DetrendStage, InputDescriptor, StageTiming, TimingBreakdown,
    };
}
