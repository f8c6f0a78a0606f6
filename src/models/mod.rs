//! Core data models for scrim analytics.

mod duel;
mod event;
mod fight;
mod hero;
mod ids;
mod leaderboard;
mod stat_row;

pub use duel::*;
pub use event::*;
pub use fight::*;
pub use hero::*;
pub use ids::*;
pub use leaderboard::*;
pub use stat_row::*;
