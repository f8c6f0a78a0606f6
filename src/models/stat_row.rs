//! Per-round player stat rows.

use serde::{Deserialize, Serialize};

use super::{MapId, PlayerStat};

/// One `player_stat` snapshot tagged with the map it was recorded on.
///
/// Rows for the same (map, player, hero) are cumulative across rounds, so the
/// row from the last round holds the map totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatRow {
    pub map_id: MapId,

    #[serde(flatten)]
    pub stat: PlayerStat,
}

impl PlayerStatRow {
    pub fn new(map_id: MapId, stat: PlayerStat) -> Self {
        Self { map_id, stat }
    }

    pub fn player_name(&self) -> &str {
        &self.stat.player_name
    }

    pub fn player_hero(&self) -> &str {
        &self.stat.player_hero
    }

    pub fn round_number(&self) -> i64 {
        self.stat.round_number
    }
}

/// A stat column that feeds the composite rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatColumn {
    Eliminations,
    FinalBlows,
    Deaths,
    HeroDamageDealt,
    HealingDealt,
    DamageBlocked,
    DamageTaken,
    SoloKills,
    UltimatesEarned,
}

impl StatColumn {
    pub fn value(&self, stat: &PlayerStat) -> f64 {
        match self {
            StatColumn::Eliminations => stat.eliminations as f64,
            StatColumn::FinalBlows => stat.final_blows as f64,
            StatColumn::Deaths => stat.deaths as f64,
            StatColumn::HeroDamageDealt => stat.hero_damage_dealt,
            StatColumn::HealingDealt => stat.healing_dealt,
            StatColumn::DamageBlocked => stat.damage_blocked,
            StatColumn::DamageTaken => stat.damage_taken,
            StatColumn::SoloKills => stat.solo_kills as f64,
            StatColumn::UltimatesEarned => stat.ultimates_earned as f64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatColumn::Eliminations => "eliminations",
            StatColumn::FinalBlows => "final_blows",
            StatColumn::Deaths => "deaths",
            StatColumn::HeroDamageDealt => "hero_damage_dealt",
            StatColumn::HealingDealt => "healing_dealt",
            StatColumn::DamageBlocked => "damage_blocked",
            StatColumn::DamageTaken => "damage_taken",
            StatColumn::SoloKills => "solo_kills",
            StatColumn::UltimatesEarned => "ultimates_earned",
        }
    }
}

impl std::fmt::Display for StatColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
