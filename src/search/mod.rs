//! End-to-end transit search over a single light curve.
//!
//! [`TransitSearch`] chains the stages in a fixed order and returns either the
//! bare [`TransitCandidate`](crate::types::TransitCandidate) or a
//! [`SearchReport`] holding every intermediate product and a
//! [`PipelineTrace`](crate::diagnostics::PipelineTrace). Any stage error
//! aborts the run and is returned unchanged.

mod params;
mod pipeline;

pub use params::SearchParams;
pub use pipeline::{SearchReport, TransitSearch};
