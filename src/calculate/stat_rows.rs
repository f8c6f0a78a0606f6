//! Reduction of cumulative `player_stat` rows.
//!
//! A `player_stat` snapshot is emitted per player, per hero, per round, and
//! every snapshot carries totals so far. Exports are frequently replayed, so
//! the same snapshot can arrive more than once.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::models::PlayerStatRow;

/// Identity of one snapshot: map, round, player, hero and match time.
fn row_key(row: &PlayerStatRow) -> (String, i64, String, String, u64) {
    (
        row.map_id.as_str().to_string(),
        row.round_number(),
        row.player_name().to_string(),
        row.player_hero().to_string(),
        row.stat.match_time.to_bits(),
    )
}

/// Drop repeated snapshots, keeping the first occurrence and input order.
///
/// Running this on its own output returns the same rows.
pub fn dedup_stat_rows(rows: &[PlayerStatRow]) -> Vec<PlayerStatRow> {
    let mut seen = HashSet::new();
    let deduped: Vec<PlayerStatRow> = rows
        .iter()
        .filter(|row| seen.insert(row_key(row)))
        .cloned()
        .collect();

    if deduped.len() != rows.len() {
        debug!("Dropped {} duplicate stat rows", rows.len() - deduped.len());
    }
    deduped
}

/// The last-round row for each (map, player).
///
/// Ties on round number go to the row that appears later in the input. The
/// result is ordered by map then player.
pub fn final_round_rows<'a, I>(rows: I) -> Vec<&'a PlayerStatRow>
where
    I: IntoIterator<Item = &'a PlayerStatRow>,
{
    let mut latest: BTreeMap<(&str, &str), &PlayerStatRow> = BTreeMap::new();
    for row in rows {
        let key = (row.map_id.as_str(), row.player_name());
        match latest.get(&key) {
            Some(current) if current.round_number() > row.round_number() => {}
            _ => {
                latest.insert(key, row);
            }
        }
    }
    latest.into_values().collect()
}

/// Rows recorded for `hero`.
pub fn rows_for_hero<'a>(rows: &'a [PlayerStatRow], hero: &str) -> Vec<&'a PlayerStatRow> {
    rows.iter().filter(|r| r.player_hero() == hero).collect()
}

/// Total `hero_time_played` per hero for one player, read from each
/// (map, hero) final-round row.
pub fn hero_time_by_player(rows: &[PlayerStatRow], player: &str) -> BTreeMap<String, f64> {
    let mut latest: BTreeMap<(&str, &str), &PlayerStatRow> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.player_name() == player) {
        let key = (row.map_id.as_str(), row.player_hero());
        match latest.get(&key) {
            Some(current) if current.round_number() > row.round_number() => {}
            _ => {
                latest.insert(key, row);
            }
        }
    }

    let mut totals = BTreeMap::new();
    for row in latest.into_values() {
        *totals.entry(row.player_hero().to_string()).or_insert(0.0) += row.stat.hero_time_played;
    }
    totals
}
