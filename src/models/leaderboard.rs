//! Composite skill rating output models.

use serde::{Deserialize, Serialize};

use super::{Role, StatColumn};

/// One stat column for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScore {
    pub column: StatColumn,

    /// Column total scaled to a 600 second basis
    pub per_10: f64,

    /// `None` when the population baseline is degenerate
    pub zscore: Option<f64>,
}

/// A ranked player on a hero leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeSRRow {
    pub player_name: String,
    pub hero: String,
    pub role: Role,
    pub maps_played: u32,
    pub total_seconds: f64,
    pub columns: Vec<ColumnScore>,
    pub composite_zscore: f64,
    pub composite_sr: i32,

    /// 1-based, strict
    pub rank: u32,

    /// Share of the population at or below this score, 0 to 100
    pub percentile: f64,
}

impl CompositeSRRow {
    pub fn column(&self, column: StatColumn) -> Option<&ColumnScore> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// A full leaderboard for one hero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub hero: String,
    pub role: Role,

    /// Number of qualifying players before the limit is applied
    pub population: usize,

    /// Columns whose Z-scores were neutralised
    pub degenerate_columns: Vec<StatColumn>,

    pub rows: Vec<CompositeSRRow>,
}
