//! Trial period × duration grids for the BLS search.
use crate::error::{Result, TransitError};
use crate::stats::linspace;
use serde::{Deserialize, Serialize};

/// Search space of the periodogram.
///
/// Periods are strictly increasing; every duration is positive and shorter
/// than the smallest period. The fields are public so callers can supply any
/// grid; [`TrialGrid::validate`] is run by the search before use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialGrid {
    pub periods: Vec<f64>,
    pub durations: Vec<f64>,
}

impl TrialGrid {
    /// Validated grid from explicit period and duration lists.
    pub fn new(periods: Vec<f64>, durations: Vec<f64>) -> Result<Self> {
        let grid = Self { periods, durations };
        grid.validate()?;
        Ok(grid)
    }

    /// `n` periods evenly spaced in period over `[min_period, max_period]`.
    pub fn linear(min_period: f64, max_period: f64, n: usize, durations: Vec<f64>) -> Result<Self> {
        check_range(min_period, max_period, n)?;
        Self::new(linspace(min_period, max_period, n), durations)
    }

    /// `n` periods evenly spaced in frequency between `1/max_period` and
    /// `1/min_period`, stored in increasing period order.
    pub fn uniform_frequency(
        min_period: f64,
        max_period: f64,
        n: usize,
        durations: Vec<f64>,
    ) -> Result<Self> {
        check_range(min_period, max_period, n)?;
        let mut periods: Vec<f64> = linspace(1.0 / max_period, 1.0 / min_period, n)
            .into_iter()
            .map(|f| 1.0 / f)
            .collect();
        periods.reverse();
        // Pin the endpoints so reciprocal rounding cannot leave the range.
        periods[0] = min_period;
        periods[n - 1] = max_period;
        Self::new(periods, durations)
    }

    pub fn min_period(&self) -> Option<f64> {
        self.periods.first().copied()
    }

    pub fn max_period(&self) -> Option<f64> {
        self.periods.last().copied()
    }

    /// Check the grid invariants, failing with a configuration error.
    pub fn validate(&self) -> Result<()> {
        if self.periods.is_empty() {
            return Err(TransitError::config("trial grid has no periods"));
        }
        if self.durations.is_empty() {
            return Err(TransitError::config("trial grid has no durations"));
        }
        let min_period = self.periods[0];
        let max_period = self.periods[self.periods.len() - 1];
        if !(min_period < max_period) {
            return Err(TransitError::config(format!(
                "min_period ({min_period}) must be below max_period ({max_period})"
            )));
        }
        if !(min_period.is_finite() && min_period > 0.0 && max_period.is_finite()) {
            return Err(TransitError::config(format!(
                "periods must be finite and positive, got [{min_period}, {max_period}]"
            )));
        }
        if let Some(w) = self.periods.windows(2).find(|w| !(w[1] > w[0])) {
            return Err(TransitError::config(format!(
                "periods must be strictly increasing ({} followed by {})",
                w[0], w[1]
            )));
        }
        for &d in &self.durations {
            if !(d.is_finite() && d > 0.0) {
                return Err(TransitError::config(format!(
                    "durations must be finite and positive, got {d}"
                )));
            }
            if d >= min_period {
                return Err(TransitError::config(format!(
                    "duration {d} is not shorter than the smallest period {min_period}"
                )));
            }
        }
        Ok(())
    }
}

fn check_range(min_period: f64, max_period: f64, n: usize) -> Result<()> {
    if n < 2 {
        return Err(TransitError::config(format!(
            "at least two trial periods are required, got {n}"
        )));
    }
    if !(min_period.is_finite() && min_period > 0.0) {
        return Err(TransitError::config(format!(
            "min_period must be finite and positive, got {min_period}"
        )));
    }
    if !(max_period.is_finite() && min_period < max_period) {
        return Err(TransitError::config(format!(
            "min_period ({min_period}) must be below max_period ({max_period})"
        )));
    }
    Ok(())
}

/// How trial periods are distributed between the bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodSpacing {
    #[default]
    Linear,
    UniformFrequency,
}

/// Grid description as found in configuration files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    pub min_period: f64,
    pub max_period: f64,
    pub n_periods: usize,
    pub spacing: PeriodSpacing,
    /// Trial durations in days.
    pub durations: Vec<f64>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            min_period: 0.5,
            max_period: 20.0,
            n_periods: 10_000,
            spacing: PeriodSpacing::Linear,
            durations: linspace(0.05, 0.3, 10),
        }
    }
}

impl GridOptions {
    pub fn with_period_range(mut self, min_period: f64, max_period: f64) -> Self {
        self.min_period = min_period;
        self.max_period = max_period;
        self
    }

    pub fn with_n_periods(mut self, n_periods: usize) -> Self {
        self.n_periods = n_periods;
        self
    }

    pub fn build(&self) -> Result<TrialGrid> {
        match self.spacing {
            PeriodSpacing::Linear => TrialGrid::linear(
                self.min_period,
                self.max_period,
                self.n_periods,
                self.durations.clone(),
            ),
            PeriodSpacing::UniformFrequency => TrialGrid::uniform_frequency(
                self.min_period,
                self.max_period,
                self.n_periods,
                self.durations.clone(),
            ),
        }
    }
}
