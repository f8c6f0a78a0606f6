//! Hero-versus-hero duel model.

use serde::{Deserialize, Serialize};

/// Kill/death tally between a subject player's hero and one enemy hero.
///
/// Counters are named from the enemy's side: `enemy_kills` counts the
/// subject's deaths to that hero, `enemy_deaths` counts the subject's kills on
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Duel {
    pub player_hero: String,
    pub enemy_hero: String,
    pub enemy_kills: u32,
    pub enemy_deaths: u32,

    /// Enemy player and team at the most recent encounter
    pub enemy_name: String,
    pub enemy_team: String,

    /// Match time of the most recent encounter
    pub last_seen: f64,
}

impl Duel {
    pub fn engagements(&self) -> u32 {
        self.enemy_kills + self.enemy_deaths
    }

    /// `enemy_kills / engagements * 100`, or `None` with no engagements.
    pub fn win_rate(&self) -> Option<f64> {
        let total = self.engagements();
        if total == 0 {
            None
        } else {
            Some(self.enemy_kills as f64 / total as f64 * 100.0)
        }
    }
}
