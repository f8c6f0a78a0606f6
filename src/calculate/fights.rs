//! Fight segmentation.
//!
//! Kills are clustered into fights by the gap between consecutive kills. The
//! same primitive serves the map-wide view, per-player views and the fixed
//! interval used for charts.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::AnalyticsError;
use crate::models::{CombatEvent, Fight};
use crate::stream::EventStream;

/// Default gap between kills that closes a fight, in seconds.
pub const DEFAULT_FIGHT_GAP_SECONDS: f64 = 15.0;

/// Split time-ordered kills into fights.
///
/// A kill joins the current fight when it lands within `gap_seconds` of the
/// previous kill; otherwise it opens a new fight.
pub fn segment<'a, I>(kills: I, gap_seconds: f64) -> Vec<Fight>
where
    I: IntoIterator<Item = &'a CombatEvent>,
{
    let mut fights = Vec::new();
    let mut current: Option<Fight> = None;

    for kill in kills {
        current = Some(match current.take() {
            Some(mut fight) if kill.match_time - fight.end <= gap_seconds => {
                fight.push(kill.clone());
                fight
            }
            Some(fight) => {
                fights.push(fight);
                Fight::open(kill.clone())
            }
            None => Fight::open(kill.clone()),
        });
    }

    if let Some(fight) = current {
        fights.push(fight);
    }

    debug!("Segmented kills into {} fights", fights.len());
    fights
}

/// All fights on the map.
pub fn map_fights(stream: &EventStream, gap_seconds: f64) -> Vec<Fight> {
    segment(stream.kills(), gap_seconds)
}

/// Fights built only from kills the player scored or suffered.
pub fn player_fights(stream: &EventStream, player: &str, gap_seconds: f64) -> Vec<Fight> {
    segment(
        stream
            .kills()
            .into_iter()
            .filter(|k| k.attacker_name == player || k.victim_name == player),
        gap_seconds,
    )
}

/// Kill clusters at the fixed charting interval.
pub fn group_kills_by_interval<'a, I>(kills: I) -> Vec<Fight>
where
    I: IntoIterator<Item = &'a CombatEvent>,
{
    segment(kills, DEFAULT_FIGHT_GAP_SECONDS)
}

/// Fights won per team. Tied fights count for nobody.
pub fn fight_record(fights: &[Fight]) -> BTreeMap<String, usize> {
    let mut record = BTreeMap::new();
    for fight in fights {
        if let Some(team) = fight.winner() {
            *record.entry(team.to_string()).or_insert(0) += 1;
        }
    }
    record
}

fn rate_of<F>(fights: &[Fight], what: &'static str, hit: F) -> Result<f64, AnalyticsError>
where
    F: Fn(&CombatEvent) -> bool,
{
    if fights.is_empty() {
        return Err(AnalyticsError::insufficient(what));
    }
    let hits = fights
        .iter()
        .filter(|f| f.first_kill().map(&hit).unwrap_or(false))
        .count();
    Ok(hits as f64 / fights.len() as f64 * 100.0)
}

/// Percentage of fights opened by a kill from `player`.
pub fn first_pick_rate(fights: &[Fight], player: &str) -> Result<f64, AnalyticsError> {
    rate_of(fights, "first pick rate", |k| k.attacker_name == player)
}

/// Percentage of fights opened by `player` dying.
pub fn first_death_rate(fights: &[Fight], player: &str) -> Result<f64, AnalyticsError> {
    rate_of(fights, "first death rate", |k| k.victim_name == player)
}

/// Percentage of fights where `player` scored nothing, the enemy scored at
/// least twice, and `team` still took the fight.
pub fn fight_reversal_rate(
    fights: &[Fight],
    player: &str,
    team: &str,
) -> Result<f64, AnalyticsError> {
    if fights.is_empty() {
        return Err(AnalyticsError::insufficient("fight reversal rate"));
    }
    let reversals = fights
        .iter()
        .filter(|f| {
            f.kills_by_player(player) == 0 && f.kills_against(team) >= 2 && f.winner() == Some(team)
        })
        .count();
    Ok(reversals as f64 / fights.len() as f64 * 100.0)
}
