use serde::{Deserialize, Serialize};

/// Statistic maximised over durations and phase offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
    /// Log-likelihood gain of the box model over a constant, `0.5 Δχ²`.
    #[default]
    Likelihood,
    /// Signal-to-noise ratio of the fitted depth.
    Snr,
}

/// Options of the box-least-squares search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlsOptions {
    pub objective: Objective,
}

impl BlsOptions {
    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = objective;
        self
    }
}
