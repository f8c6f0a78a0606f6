//! X-Factor: a role-weighted impact score for one player on one map.
//!
//! Signals:
//! - Fleta deadlift: share of the team's final blows, against teammates only
//! - Deaths per 10 minutes, rewarded up to 5 and penalised above
//! - First pick % (damage) or first death % (tank)
//! - Average duel win rate
//! - Fight reversal %

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::error::AnalyticsError;
use crate::models::{PlayerStatRow, Role};
use crate::stream::EventStream;

use super::duels::{average_duel_win_rate, player_duels};
use super::fights::{
    fight_reversal_rate, first_death_rate, first_pick_rate, map_fights, DEFAULT_FIGHT_GAP_SECONDS,
};
use super::stat_rows::{dedup_stat_rows, hero_time_by_player};
use super::{per_10, round_to};

/// Deaths per 10 above this flip from a reward to a penalty.
const DEATHS_PENALTY_THRESHOLD: f64 = 5.0;

/// Signal weights for one role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XFactorWeights {
    pub fleta_deadlift: f64,
    pub deaths: f64,
    pub first_pick: f64,
    pub first_death: f64,
    pub duel_win_rate: f64,
    pub fight_reversal: f64,
}

impl XFactorWeights {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Damage => Self {
                fleta_deadlift: 0.5,
                deaths: 0.2,
                first_pick: 0.1,
                first_death: 0.0,
                duel_win_rate: 0.1,
                fight_reversal: 0.1,
            },
            Role::Tank => Self {
                fleta_deadlift: 0.5,
                deaths: 0.2,
                first_pick: 0.0,
                first_death: 0.15,
                duel_win_rate: 0.05,
                fight_reversal: 0.1,
            },
            Role::Support => Self {
                fleta_deadlift: 0.5,
                deaths: 0.2,
                first_pick: 0.0,
                first_death: 0.0,
                duel_win_rate: 0.15,
                fight_reversal: 0.15,
            },
        }
    }
}

/// Score with the raw value of each signal.
///
/// Signals that could not be computed (no fights, no duels) are `None` and
/// contribute nothing to `score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XFactor {
    pub player_name: String,
    pub team: String,
    pub hero: String,
    pub role: Role,
    pub fleta_deadlift: f64,
    pub deaths_per_10: f64,

    /// Deaths term after the reward/penalty transform
    pub deaths_term: f64,

    pub first_pick: Option<f64>,
    pub first_death: Option<f64>,
    pub duel_win_rate: Option<f64>,
    pub fight_reversal: Option<f64>,

    /// Rounded to two decimal places
    pub score: f64,
}

/// Player's share of final blows against the rest of their team.
///
/// The denominator is held at a minimum of 1 so a player holding every
/// final blow still scores.
pub fn fleta_deadlift(player_final_blows: f64, team_final_blows: f64) -> f64 {
    let others = (team_final_blows - player_final_blows).max(1.0);
    player_final_blows / others * 100.0
}

/// `1 + d` up to five deaths per 10, `-d` beyond.
pub fn deaths_term(deaths_per_10: f64) -> f64 {
    if deaths_per_10 > DEATHS_PENALTY_THRESHOLD {
        -deaths_per_10
    } else {
        1.0 + deaths_per_10
    }
}

/// Scores players on a single map.
#[derive(Debug, Clone)]
pub struct XFactorScorer {
    gap_seconds: f64,
}

impl Default for XFactorScorer {
    fn default() -> Self {
        Self::new(DEFAULT_FIGHT_GAP_SECONDS)
    }
}

impl XFactorScorer {
    pub fn new(gap_seconds: f64) -> Self {
        Self { gap_seconds }
    }

    pub fn score(&self, stream: &EventStream, player: &str) -> Result<XFactor, AnalyticsError> {
        let rows = dedup_stat_rows(&stream.stat_rows());
        let finals = final_rows_by_hero(&rows);

        let player_rows: Vec<&PlayerStatRow> = finals
            .iter()
            .copied()
            .filter(|r| r.player_name() == player)
            .collect();
        let team = player_rows
            .first()
            .map(|r| r.stat.player_team.clone())
            .ok_or_else(|| AnalyticsError::PlayerNotFound(player.to_string()))?;

        let hero = hero_time_by_player(&rows, player)
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(hero, _)| hero)
            .ok_or_else(|| AnalyticsError::PlayerNotFound(player.to_string()))?;
        let role = Role::of_hero(&hero).ok_or_else(|| AnalyticsError::UnknownHero(hero.clone()))?;

        let player_final_blows: f64 = player_rows.iter().map(|r| r.stat.final_blows as f64).sum();
        let team_final_blows: f64 = finals
            .iter()
            .filter(|r| r.stat.player_team == team)
            .map(|r| r.stat.final_blows as f64)
            .sum();
        let deaths: f64 = player_rows.iter().map(|r| r.stat.deaths as f64).sum();
        let seconds: f64 = player_rows.iter().map(|r| r.stat.hero_time_played).sum();
        if seconds <= 0.0 {
            return Err(AnalyticsError::insufficient("deaths per 10"));
        }

        let fleta = fleta_deadlift(player_final_blows, team_final_blows);
        let deaths_per_10 = per_10(deaths, seconds);
        let deaths_term = deaths_term(deaths_per_10);

        let fights = map_fights(stream, self.gap_seconds);
        let first_pick = match role {
            Role::Damage => first_pick_rate(&fights, player).ok(),
            _ => None,
        };
        let first_death = match role {
            Role::Tank => first_death_rate(&fights, player).ok(),
            _ => None,
        };
        let duel_win_rate = average_duel_win_rate(&player_duels(stream, player)).ok();
        let fight_reversal = fight_reversal_rate(&fights, player, &team).ok();

        let w = XFactorWeights::for_role(role);
        let total = w.fleta_deadlift * fleta
            + w.deaths * deaths_term
            + w.first_pick * first_pick.unwrap_or(0.0)
            + w.first_death * first_death.unwrap_or(0.0)
            + w.duel_win_rate * duel_win_rate.unwrap_or(0.0)
            + w.fight_reversal * fight_reversal.unwrap_or(0.0);

        debug!(
            "X-Factor for {} ({}, {}) on {}: {:.2}",
            player,
            hero,
            role,
            stream.map_id(),
            total
        );

        Ok(XFactor {
            player_name: player.to_string(),
            team,
            hero,
            role,
            fleta_deadlift: fleta,
            deaths_per_10,
            deaths_term,
            first_pick,
            first_death,
            duel_win_rate,
            fight_reversal,
            score: round_to(total, 2),
        })
    }
}

/// The latest row for each (player, hero); rows are cumulative per hero.
fn final_rows_by_hero(rows: &[PlayerStatRow]) -> Vec<&PlayerStatRow> {
    let mut latest: BTreeMap<(&str, &str), &PlayerStatRow> = BTreeMap::new();
    for row in rows {
        let key = (row.player_name(), row.player_hero());
        match latest.get(&key) {
            Some(current) if current.round_number() > row.round_number() => {}
            _ => {
                latest.insert(key, row);
            }
        }
    }
    latest.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerStat, TypedEvent};
    use crate::stream::fixtures::{kill, round_end, round_start, stream};
    use pretty_assertions::assert_eq;

    fn stat(
        round: i64,
        team: &str,
        player: &str,
        hero: &str,
        fb: i64,
        deaths: i64,
        time: f64,
    ) -> TypedEvent {
        TypedEvent::PlayerStat(PlayerStat {
            match_time: time,
            round_number: round,
            player_team: team.to_string(),
            player_name: player.to_string(),
            player_hero: hero.to_string(),
            final_blows: fb,
            deaths,
            hero_time_played: time,
            ..PlayerStat::default()
        })
    }

    #[test]
    fn test_fleta_deadlift_example() {
        assert_eq!(fleta_deadlift(10.0, 30.0), 50.0);
    }

    #[test]
    fn test_fleta_deadlift_with_no_teammate_final_blows() {
        assert_eq!(fleta_deadlift(4.0, 4.0), 400.0);
        assert_eq!(fleta_deadlift(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_deaths_term_examples() {
        assert_eq!(deaths_term(3.0), 4.0);
        assert_eq!(deaths_term(7.0), -7.0);
        assert_eq!(deaths_term(5.0), 6.0);
        assert_eq!(deaths_term(5.01), -5.01);
    }

    #[test]
    fn test_weights_per_role() {
        let damage = XFactorWeights::for_role(Role::Damage);
        assert_eq!(damage.first_pick, 0.1);
        assert_eq!(damage.first_death, 0.0);

        let tank = XFactorWeights::for_role(Role::Tank);
        assert_eq!(tank.first_death, 0.15);
        assert_eq!(tank.duel_win_rate, 0.05);

        let support = XFactorWeights::for_role(Role::Support);
        assert_eq!(support.first_pick + support.first_death, 0.0);
        assert_eq!(support.fight_reversal, 0.15);
    }

    #[test]
    fn test_score_damage_player() {
        let s = stream(vec![
            round_start(0.0, 1),
            kill(10.0, ("A", "Sparky", "Tracer"), ("B", "Halo", "Ana")),
            kill(11.0, ("A", "Other", "Genji"), ("B", "Rock", "Reinhardt")),
            kill(60.0, ("B", "Halo", "Ana"), ("A", "Sparky", "Tracer")),
            round_end(600.0, 1),
            stat(1, "A", "Sparky", "Tracer", 10, 3, 600.0),
            stat(1, "A", "Other", "Genji", 20, 2, 600.0),
            stat(1, "B", "Halo", "Ana", 5, 4, 600.0),
        ]);

        let x = XFactorScorer::default().score(&s, "Sparky").unwrap();
        assert_eq!(x.role, Role::Damage);
        assert_eq!(x.hero, "Tracer");
        assert_eq!(x.team, "A");
        assert_eq!(x.fleta_deadlift, 50.0);
        assert_eq!(x.deaths_per_10, 3.0);
        assert_eq!(x.deaths_term, 4.0);
        // Two fights: Sparky opens the first.
        assert_eq!(x.first_pick, Some(50.0));
        assert_eq!(x.first_death, None);
        assert_eq!(x.duel_win_rate, Some(50.0));
        assert_eq!(x.fight_reversal, Some(0.0));

        // .5*50 + .2*4 + .1*50 + .1*50 + .1*0
        assert_eq!(x.score, 35.8);
    }

    #[test]
    fn test_score_uses_final_round_and_most_played_hero() {
        let s = stream(vec![
            stat(1, "A", "Wall", "Reinhardt", 1, 1, 200.0),
            stat(2, "A", "Wall", "Reinhardt", 2, 7, 500.0),
            stat(2, "A", "Wall", "Winston", 0, 0, 100.0),
            stat(2, "A", "Mate", "Ana", 4, 1, 600.0),
        ]);

        let x = XFactorScorer::default().score(&s, "Wall").unwrap();
        assert_eq!(x.role, Role::Tank);
        assert_eq!(x.hero, "Reinhardt");
        // 2 / (6 - 2)
        assert_eq!(x.fleta_deadlift, 50.0);
        // 7 deaths over 600 seconds
        assert_eq!(x.deaths_per_10, 7.0);
        assert_eq!(x.deaths_term, -7.0);
        assert_eq!(x.first_death, None);
        assert_eq!(x.duel_win_rate, None);
        // .5*50 + .2*-7
        assert_eq!(x.score, 23.6);
    }

    /// Two fights. Wall dies first in the first and wins it; the second is a
    /// reversal for Wall, with Mate taking two of team A's three kills.
    fn brawl() -> EventStream {
        const WALL: (&str, &str, &str) = ("A", "Wall", "Reinhardt");
        const MATE: (&str, &str, &str) = ("A", "Mate", "Ana");
        const OTHER: (&str, &str, &str) = ("A", "Other", "Genji");
        const HALO: (&str, &str, &str) = ("B", "Halo", "Ana");
        const ROCK: (&str, &str, &str) = ("B", "Rock", "Winston");
        const ZED: (&str, &str, &str) = ("B", "Zed", "Tracer");

        stream(vec![
            kill(10.0, HALO, WALL),
            kill(12.0, WALL, ROCK),
            kill(13.0, WALL, ROCK),
            kill(100.0, HALO, MATE),
            kill(101.0, ROCK, OTHER),
            kill(103.0, MATE, ZED),
            kill(104.0, OTHER, ROCK),
            kill(105.0, MATE, HALO),
            stat(1, "A", "Wall", "Reinhardt", 2, 1, 600.0),
            stat(1, "A", "Mate", "Ana", 4, 1, 600.0),
            stat(1, "A", "Other", "Genji", 2, 1, 600.0),
        ])
    }

    #[test]
    fn test_score_tank_counts_first_deaths() {
        let x = XFactorScorer::default().score(&brawl(), "Wall").unwrap();
        assert_eq!(x.role, Role::Tank);
        // 2 / (8 - 2)
        assert!((x.fleta_deadlift - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(x.deaths_term, 2.0);
        assert_eq!(x.first_pick, None);
        assert_eq!(x.first_death, Some(50.0));
        // Reinhardt v Winston 0%, Reinhardt v Ana 100%
        assert_eq!(x.duel_win_rate, Some(50.0));
        assert_eq!(x.fight_reversal, Some(50.0));

        // .5*33.33 + .2*2 + .15*50 + .05*50 + .1*50
        assert_eq!(x.score, 32.07);
    }

    #[test]
    fn test_score_support_player() {
        let x = XFactorScorer::default().score(&brawl(), "Mate").unwrap();
        assert_eq!(x.role, Role::Support);
        assert_eq!(x.hero, "Ana");
        // 4 / (8 - 4)
        assert_eq!(x.fleta_deadlift, 100.0);
        assert_eq!(x.deaths_term, 2.0);
        assert_eq!(x.first_pick, None);
        assert_eq!(x.first_death, None);
        // Ana v Ana 50%, Ana v Tracer 0%
        assert_eq!(x.duel_win_rate, Some(25.0));
        assert_eq!(x.fight_reversal, Some(0.0));

        // .5*100 + .2*2 + .15*25 + .15*0
        assert_eq!(x.score, 54.15);
    }

    #[test]
    fn test_score_unknown_player() {
        let s = stream(vec![stat(1, "A", "Sparky", "Tracer", 1, 0, 60.0)]);
        let err = XFactorScorer::default().score(&s, "Nobody").unwrap_err();
        assert_eq!(err, AnalyticsError::PlayerNotFound("Nobody".to_string()));
    }

    #[test]
    fn test_score_unknown_hero() {
        let s = stream(vec![stat(1, "A", "Sparky", "Mystery", 1, 0, 60.0)]);
        let err = XFactorScorer::default().score(&s, "Sparky").unwrap_err();
        assert_eq!(err, AnalyticsError::UnknownHero("Mystery".to_string()));
    }
}
