//! Hero-versus-hero duel aggregation.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::AnalyticsError;
use crate::models::{CombatEvent, Duel};
use crate::stream::EventStream;

/// Merge a player's kills and deaths into one tally per hero pairing.
///
/// A kill is keyed `(attacker_hero, victim_hero)` and counts as an enemy
/// death; a death is keyed `(victim_hero, attacker_hero)` and counts as an
/// enemy kill. Output is ordered by `(player_hero, enemy_hero)`.
pub fn aggregate(kills: &[&CombatEvent], deaths: &[&CombatEvent]) -> Vec<Duel> {
    let mut duels: BTreeMap<(String, String), Duel> = BTreeMap::new();

    for kill in kills {
        let duel = entry(&mut duels, &kill.attacker_hero, &kill.victim_hero);
        duel.enemy_deaths += 1;
        seen(duel, &kill.victim_name, &kill.victim_team, kill.match_time);
    }

    for death in deaths {
        let duel = entry(&mut duels, &death.victim_hero, &death.attacker_hero);
        duel.enemy_kills += 1;
        seen(duel, &death.attacker_name, &death.attacker_team, death.match_time);
    }

    debug!(
        "Aggregated {} kills and {} deaths into {} duels",
        kills.len(),
        deaths.len(),
        duels.len()
    );
    duels.into_values().collect()
}

fn entry<'a>(
    duels: &'a mut BTreeMap<(String, String), Duel>,
    player_hero: &str,
    enemy_hero: &str,
) -> &'a mut Duel {
    duels
        .entry((player_hero.to_string(), enemy_hero.to_string()))
        .or_insert_with(|| Duel {
            player_hero: player_hero.to_string(),
            enemy_hero: enemy_hero.to_string(),
            enemy_kills: 0,
            enemy_deaths: 0,
            enemy_name: String::new(),
            enemy_team: String::new(),
            last_seen: f64::NEG_INFINITY,
        })
}

fn seen(duel: &mut Duel, name: &str, team: &str, match_time: f64) {
    if match_time >= duel.last_seen {
        duel.enemy_name = name.to_string();
        duel.enemy_team = team.to_string();
        duel.last_seen = match_time;
    }
}

/// Duels for `player` on one map.
pub fn player_duels(stream: &EventStream, player: &str) -> Vec<Duel> {
    aggregate(&stream.kills_by(player), &stream.deaths_of(player))
}

/// Mean of per-pairing win rates, skipping pairings with no engagements.
pub fn average_duel_win_rate(duels: &[Duel]) -> Result<f64, AnalyticsError> {
    let rates: Vec<f64> = duels.iter().filter_map(Duel::win_rate).collect();
    if rates.is_empty() {
        return Err(AnalyticsError::insufficient("average duel win rate"));
    }
    Ok(rates.iter().sum::<f64>() / rates.len() as f64)
}
