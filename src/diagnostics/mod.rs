//! Diagnostics data model returned next to every stage result.
//!
//! Each stage function has a `*_detailed` twin returning its output together
//! with a serde-serialisable stage record. [`PipelineTrace`] collects all of
//! them for a full search run so callers can log or persist what happened
//! without the core touching any global state.

pub mod pipeline;
pub mod stages;
pub mod timing;

pub use pipeline::{InputDescriptor, PipelineTrace};
pub use stages::{BlsStage, CleanStage, DetrendStage};
pub use timing::{StageTiming, TimingBreakdown};
