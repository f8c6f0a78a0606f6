//! Errors raised by the analytics calculations.

use thiserror::Error;

use crate::models::StatColumn;

/// A calculation that could not produce a value.
///
/// None of these are fatal: callers render them as a "no data" state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    #[error("Not enough data to compute {what}")]
    InsufficientData { what: &'static str },

    #[error("Standard deviation of {column} is zero or undefined")]
    DegenerateStatistics { column: StatColumn },

    #[error("Unknown hero: {0}")]
    UnknownHero(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),
}

impl AnalyticsError {
    pub fn insufficient(what: &'static str) -> Self {
        AnalyticsError::InsufficientData { what }
    }

    /// True for the "no data" family of results.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            AnalyticsError::InsufficientData { .. } | AnalyticsError::PlayerNotFound(_)
        )
    }
}
