//! Error type shared by every pipeline stage.
//!
//! Two kinds exist: [`TransitError::Data`] for empty or degenerate input
//! (nothing usable after cleaning, an empty periodogram) and
//! [`TransitError::Config`] for invalid parameters (non-positive windows,
//! inconsistent trial grids). Stages fail synchronously and never retry.
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TransitError>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum TransitError {
    /// Empty or degenerate input data.
    #[error("data error: {0}")]
    Data(String),
    /// Invalid search, grid or window parameters.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TransitError {
    pub(crate) fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
