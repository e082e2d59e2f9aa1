//! Box-least-squares period search.
//!
//! For every trial period the light curve is folded and sorted by phase. For
//! every trial duration a box is started at each sample phase and ended at
//! each sample phase (wrapping past phase 1), which between them produce
//! every distinct in-box sample set. The in-box and out-of-box weighted means
//! are read from cumulative sums in constant time. The best box per period is
//! the one that maximises the configured [`Objective`] among boxes that show
//! a dip.
//!
//! Weights are `1/σ²` when every sample carries a flux error and a constant
//! `1/s²` (with `s` the flux standard deviation) otherwise. Periods are
//! evaluated independently, in parallel with the `parallel` feature.

mod engine;
mod grid;
mod options;
mod peak;
mod periodogram;

pub use engine::{search, search_detailed, BlsOutput};
pub use grid::{GridOptions, PeriodSpacing, TrialGrid};
pub use options::{BlsOptions, Objective};
pub use peak::select;
pub use periodogram::{BoxFit, Periodogram};
