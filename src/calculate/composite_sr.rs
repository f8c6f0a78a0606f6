//! Composite SR: per-hero leaderboards built from Z-scored per-10 stats.
//!
//! The pipeline runs over the qualifying population for one hero:
//! final-round reduction per (map, player), per-player totals, per-10
//! normalisation, population baseline, Z-scores, weighted composite, and a
//! bounded rating centred on 2500.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::AnalyticsError;
use crate::models::{
    ColumnScore, CompositeSRRow, Leaderboard, PlayerStatRow, Role, StatColumn,
};

use super::stat_rows::{dedup_stat_rows, final_round_rows, rows_for_hero};
use super::{per_10, round_to};

/// Rating assigned to a Z-score of zero.
pub const BASELINE_RATING: i32 = 2500;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5000;

/// One column's contribution to the composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatWeight {
    pub column: StatColumn,
    pub weight: f64,

    /// Lower raw values score higher
    pub inverted: bool,
}

const fn weight(column: StatColumn, weight: f64) -> StatWeight {
    StatWeight {
        column,
        weight,
        inverted: false,
    }
}

const fn inverted(column: StatColumn, weight: f64) -> StatWeight {
    StatWeight {
        column,
        weight,
        inverted: true,
    }
}

static DAMAGE_WEIGHTS: &[StatWeight] = &[
    weight(StatColumn::Eliminations, 0.30),
    weight(StatColumn::FinalBlows, 0.20),
    inverted(StatColumn::Deaths, 0.20),
    weight(StatColumn::HeroDamageDealt, 0.20),
    weight(StatColumn::SoloKills, 0.10),
];

static TANK_WEIGHTS: &[StatWeight] = &[
    weight(StatColumn::Eliminations, 0.12),
    weight(StatColumn::FinalBlows, 0.08),
    inverted(StatColumn::Deaths, 0.25),
    weight(StatColumn::HeroDamageDealt, 0.12),
    weight(StatColumn::DamageBlocked, 0.15),
    inverted(StatColumn::DamageTaken, 0.10),
    weight(StatColumn::SoloKills, 0.15),
    weight(StatColumn::UltimatesEarned, 0.03),
];

static SUPPORT_WEIGHTS: &[StatWeight] = &[
    weight(StatColumn::Eliminations, 0.10),
    weight(StatColumn::FinalBlows, 0.05),
    inverted(StatColumn::Deaths, 0.25),
    weight(StatColumn::HeroDamageDealt, 0.14),
    weight(StatColumn::HealingDealt, 0.35),
    weight(StatColumn::SoloKills, 0.06),
    weight(StatColumn::UltimatesEarned, 0.05),
];

/// The weighted columns for one role.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleWeights {
    pub role: Role,
    pub weights: Vec<StatWeight>,
}

impl RoleWeights {
    pub fn default_for(role: Role) -> Self {
        let table = match role {
            Role::Damage => DAMAGE_WEIGHTS,
            Role::Tank => TANK_WEIGHTS,
            Role::Support => SUPPORT_WEIGHTS,
        };
        Self {
            role,
            weights: table.to_vec(),
        }
    }

    /// Replace weights for columns in this role's table. Columns outside the
    /// table are ignored.
    pub fn with_overrides(mut self, overrides: &BTreeMap<StatColumn, f64>) -> Self {
        for (column, value) in overrides {
            match self.weights.iter_mut().find(|w| w.column == *column) {
                Some(w) => w.weight = *value,
                None => warn!("Ignoring {} weight override for {}", column, self.role),
            }
        }
        self
    }

    /// True when `column` is part of this role's table.
    pub fn contains(&self, column: StatColumn) -> bool {
        self.weights.iter().any(|w| w.column == column)
    }
}

/// Qualification and weighting for a leaderboard run.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardOptions {
    pub min_maps: u32,
    pub min_time_seconds: f64,
    pub limit: usize,
    pub weight_overrides: BTreeMap<Role, BTreeMap<StatColumn, f64>>,
}

impl Default for LeaderboardOptions {
    fn default() -> Self {
        Self {
            min_maps: 10,
            min_time_seconds: 60.0,
            limit: 100,
            weight_overrides: BTreeMap::new(),
        }
    }
}

impl LeaderboardOptions {
    pub fn weights_for(&self, role: Role) -> RoleWeights {
        let weights = RoleWeights::default_for(role);
        match self.weight_overrides.get(&role) {
            Some(overrides) => weights.with_overrides(overrides),
            None => weights,
        }
    }
}

/// Map a composite Z-score onto the bounded rating scale.
pub fn rating(zscore: f64) -> i32 {
    let raw = (BASELINE_RATING as f64 + zscore * (1250.0 / (1.0 + zscore.abs() / 3.0))).floor();
    raw.clamp(MIN_RATING as f64, MAX_RATING as f64) as i32
}

/// Population mean and sample standard deviation.
///
/// Fails when fewer than two values exist or every value is identical.
pub fn baseline(column: StatColumn, values: &[f64]) -> Result<(f64, f64), AnalyticsError> {
    let n = values.len();
    if n < 2 {
        return Err(AnalyticsError::DegenerateStatistics { column });
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let stdev = variance.sqrt();
    if stdev == 0.0 || !stdev.is_finite() {
        return Err(AnalyticsError::DegenerateStatistics { column });
    }
    Ok((mean, stdev))
}

/// Z-score of `value` against a baseline, inverted columns flipping sign.
pub fn zscore(value: f64, mean: f64, stdev: f64, inverted: bool) -> f64 {
    if inverted {
        (mean - value) / stdev
    } else {
        (value - mean) / stdev
    }
}

/// Per-player totals over final-round rows.
struct PlayerTotals<'a> {
    player_name: &'a str,
    maps: u32,
    seconds: f64,
    sums: Vec<f64>,
}

/// Ranked rows for every qualifying player, plus the degenerate columns.
fn ranked_population(
    rows: &[PlayerStatRow],
    hero: &str,
    options: &LeaderboardOptions,
) -> Result<(Role, Vec<CompositeSRRow>, Vec<StatColumn>), AnalyticsError> {
    let role = Role::of_hero(hero).ok_or_else(|| AnalyticsError::UnknownHero(hero.to_string()))?;
    let weights = options.weights_for(role);

    let hero_rows: Vec<PlayerStatRow> = rows_for_hero(rows, hero).into_iter().cloned().collect();
    let deduped = dedup_stat_rows(&hero_rows);
    let finals = final_round_rows(&deduped);

    let mut totals: BTreeMap<&str, PlayerTotals> = BTreeMap::new();
    for row in finals {
        let entry = totals
            .entry(row.player_name())
            .or_insert_with(|| PlayerTotals {
                player_name: row.player_name(),
                maps: 0,
                seconds: 0.0,
                sums: vec![0.0; weights.weights.len()],
            });
        entry.maps += 1;
        entry.seconds += row.stat.hero_time_played;
        for (sum, w) in entry.sums.iter_mut().zip(&weights.weights) {
            *sum += w.column.value(&row.stat);
        }
    }

    let qualified: Vec<PlayerTotals> = totals
        .into_values()
        .filter(|t| t.maps >= options.min_maps && t.seconds >= options.min_time_seconds)
        .collect();
    debug!("{} players qualify for the {} leaderboard", qualified.len(), hero);

    let per_10s: Vec<Vec<f64>> = qualified
        .iter()
        .map(|t| t.sums.iter().map(|s| per_10(*s, t.seconds)).collect())
        .collect();

    let mut degenerate = Vec::new();
    let baselines: Vec<Option<(f64, f64)>> = weights
        .weights
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let values: Vec<f64> = per_10s.iter().map(|p| p[i]).collect();
            match baseline(w.column, &values) {
                Ok(b) => Some(b),
                Err(e) => {
                    if !qualified.is_empty() {
                        warn!("{} leaderboard: {}; column contributes 0", hero, e);
                    }
                    degenerate.push(w.column);
                    None
                }
            }
        })
        .collect();

    let mut rows: Vec<CompositeSRRow> = qualified
        .iter()
        .zip(&per_10s)
        .map(|(t, values)| {
            let columns: Vec<ColumnScore> = weights
                .weights
                .iter()
                .zip(values)
                .zip(&baselines)
                .map(|((w, value), base)| ColumnScore {
                    column: w.column,
                    per_10: *value,
                    zscore: base.map(|(mean, sd)| zscore(*value, mean, sd, w.inverted)),
                })
                .collect();
            let composite: f64 = columns
                .iter()
                .zip(&weights.weights)
                .map(|(c, w)| c.zscore.unwrap_or(0.0) * w.weight)
                .sum();

            CompositeSRRow {
                player_name: t.player_name.to_string(),
                hero: hero.to_string(),
                role,
                maps_played: t.maps,
                total_seconds: t.seconds,
                columns,
                composite_zscore: composite,
                composite_sr: rating(composite),
                rank: 0,
                percentile: 0.0,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.composite_zscore
            .total_cmp(&a.composite_zscore)
            .then_with(|| a.player_name.cmp(&b.player_name))
    });

    let n = rows.len();
    let scores: Vec<f64> = rows.iter().map(|r| r.composite_zscore).collect();
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = (i + 1) as u32;
        let at_or_below = scores.iter().filter(|z| **z <= row.composite_zscore).count();
        row.percentile = round_to(at_or_below as f64 / n as f64 * 100.0, 1);
    }

    Ok((role, rows, degenerate))
}

/// Ranked leaderboard for `hero`, truncated to `options.limit`.
pub fn leaderboard(
    rows: &[PlayerStatRow],
    hero: &str,
    options: &LeaderboardOptions,
) -> Result<Leaderboard, AnalyticsError> {
    let (role, mut ranked, degenerate_columns) = ranked_population(rows, hero, options)?;
    let population = ranked.len();
    ranked.truncate(options.limit);

    info!(
        "Built {} leaderboard: {} of {} players shown",
        hero,
        ranked.len(),
        population
    );

    Ok(Leaderboard {
        hero: hero.to_string(),
        role,
        population,
        degenerate_columns,
        rows: ranked,
    })
}

/// One player's row, measured against the full qualifying population.
pub fn lookup(
    rows: &[PlayerStatRow],
    hero: &str,
    player: &str,
    options: &LeaderboardOptions,
) -> Result<CompositeSRRow, AnalyticsError> {
    let (_, ranked, _) = ranked_population(rows, hero, options)?;
    ranked
        .into_iter()
        .find(|r| r.player_name == player)
        .ok_or_else(|| AnalyticsError::PlayerNotFound(player.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MapId, PlayerStat};
    use pretty_assertions::assert_eq;

    fn options(min_maps: u32) -> LeaderboardOptions {
        LeaderboardOptions {
            min_maps,
            ..LeaderboardOptions::default()
        }
    }

    fn tracer_row(
        map: &str,
        round: i64,
        player: &str,
        elims: i64,
        deaths: i64,
        seconds: f64,
    ) -> PlayerStatRow {
        PlayerStatRow::new(
            MapId::from(map),
            PlayerStat {
                match_time: seconds,
                round_number: round,
                player_team: "A".to_string(),
                player_name: player.to_string(),
                player_hero: "Tracer".to_string(),
                eliminations: elims,
                deaths,
                hero_time_played: seconds,
                ..PlayerStat::default()
            },
        )
    }

    #[test]
    fn test_rating_properties() {
        assert_eq!(rating(0.0), 2500);
        assert_eq!(rating(1.0), 3437);
        assert_eq!(rating(-1.0), 1562);

        let mut z = -1000.0;
        while z <= 1000.0 {
            let r = rating(z);
            assert!((MIN_RATING..=MAX_RATING).contains(&r), "z {} gave {}", z, r);
            if r == 2500 {
                assert!(z.abs() < 0.01);
            }
            z += 0.37;
        }
        assert_eq!(rating(f64::MAX), 5000);
        assert_eq!(rating(f64::MIN), 1);
    }

    #[test]
    fn test_baseline_uses_sample_stdev() {
        let (mean, sd) = baseline(StatColumn::Eliminations, &[2.0, 4.0, 6.0]).unwrap();
        assert_eq!(mean, 4.0);
        assert_eq!(sd, 2.0);

        assert!(baseline(StatColumn::Eliminations, &[3.0]).is_err());
        assert_eq!(
            baseline(StatColumn::Deaths, &[3.0, 3.0]).unwrap_err(),
            AnalyticsError::DegenerateStatistics {
                column: StatColumn::Deaths
            }
        );
    }

    #[test]
    fn test_single_player_leaderboard() {
        let rows = vec![tracer_row("m1", 1, "Sparky", 20, 5, 600.0)];
        let board = leaderboard(&rows, "Tracer", &options(1)).unwrap();

        assert_eq!(board.population, 1);
        assert_eq!(board.role, Role::Damage);
        assert_eq!(board.degenerate_columns.len(), 5);
        let row = &board.rows[0];
        assert_eq!(row.composite_zscore, 0.0);
        assert_eq!(row.composite_sr, 2500);
        assert_eq!(row.rank, 1);
        assert_eq!(row.percentile, 100.0);
        assert!(row.columns.iter().all(|c| c.zscore.is_none()));
    }

    #[test]
    fn test_final_round_rows_feed_totals() {
        let rows = vec![
            tracer_row("m1", 1, "Sparky", 5, 1, 300.0),
            tracer_row("m1", 2, "Sparky", 20, 4, 600.0),
            tracer_row("m1", 2, "Sparky", 20, 4, 600.0),
            tracer_row("m2", 1, "Sparky", 10, 2, 600.0),
        ];
        let row = lookup(&rows, "Tracer", "Sparky", &options(2)).unwrap();
        assert_eq!(row.maps_played, 2);
        assert_eq!(row.total_seconds, 1200.0);
        // 30 eliminations over 1200 seconds
        assert_eq!(row.column(StatColumn::Eliminations).unwrap().per_10, 15.0);
        assert_eq!(row.column(StatColumn::Deaths).unwrap().per_10, 3.0);
    }

    #[test]
    fn test_other_heroes_stay_out_of_population() {
        let mut genji = tracer_row("m1", 1, "Blade", 40, 1, 600.0);
        genji.stat.player_hero = "Genji".to_string();
        let mut sparky_genji = tracer_row("m2", 1, "Sparky", 40, 1, 600.0);
        sparky_genji.stat.player_hero = "Genji".to_string();

        let rows = vec![
            tracer_row("m1", 1, "Sparky", 10, 2, 600.0),
            genji,
            sparky_genji,
            tracer_row("m1", 1, "Halo", 20, 4, 600.0),
        ];
        let board = leaderboard(&rows, "Tracer", &options(1)).unwrap();
        assert_eq!(board.population, 2);

        let sparky = board.rows.iter().find(|r| r.player_name == "Sparky").unwrap();
        assert_eq!(sparky.maps_played, 1);
        assert_eq!(sparky.column(StatColumn::Eliminations).unwrap().per_10, 10.0);
    }

    #[test]
    fn test_qualification_thresholds() {
        let rows = vec![
            tracer_row("m1", 1, "Sparky", 10, 1, 600.0),
            tracer_row("m2", 1, "Sparky", 10, 1, 600.0),
            tracer_row("m1", 1, "Brief", 10, 1, 30.0),
            tracer_row("m2", 1, "Brief", 10, 1, 20.0),
            tracer_row("m1", 1, "OneMap", 10, 1, 600.0),
        ];
        let board = leaderboard(&rows, "Tracer", &options(2)).unwrap();
        let names: Vec<&str> = board.rows.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["Sparky"]);
    }

    #[test]
    fn test_ranking_and_percentiles() {
        let rows = vec![
            tracer_row("m1", 1, "Low", 5, 8, 600.0),
            tracer_row("m1", 1, "Mid", 10, 5, 600.0),
            tracer_row("m1", 1, "High", 20, 2, 600.0),
            tracer_row("m1", 1, "Mid2", 10, 5, 600.0),
        ];
        let board = leaderboard(&rows, "Tracer", &options(1)).unwrap();
        let summary: Vec<(&str, u32, f64)> = board
            .rows
            .iter()
            .map(|r| (r.player_name.as_str(), r.rank, r.percentile))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("High", 1, 100.0),
                ("Mid", 2, 75.0),
                ("Mid2", 3, 75.0),
                ("Low", 4, 25.0),
            ]
        );
        assert!(board.rows[0].composite_sr > 2500);
        assert!(board.rows[3].composite_sr < 2500);
    }

    #[test]
    fn test_percentile_is_monotonic() {
        for size in 2..12 {
            let rows: Vec<PlayerStatRow> = (0..size)
                .map(|i| {
                    let elims = (i * 7 % 11) as i64;
                    let deaths = (i * 3 % 5) as i64;
                    tracer_row("m1", 1, &format!("p{}", i), elims, deaths, 600.0 + i as f64)
                })
                .collect();
            let board = leaderboard(&rows, "Tracer", &options(1)).unwrap();
            for a in &board.rows {
                for b in &board.rows {
                    if a.composite_zscore > b.composite_zscore {
                        assert!(a.percentile >= b.percentile);
                        assert!(a.rank < b.rank);
                    }
                }
            }
        }
    }

    #[test]
    fn test_inverted_column_symmetry() {
        let before = vec![
            tracer_row("m1", 1, "A", 10, 2, 600.0),
            tracer_row("m1", 1, "B", 10, 6, 600.0),
            tracer_row("m1", 1, "C", 10, 4, 600.0),
        ];
        let after = vec![
            tracer_row("m1", 1, "A", 10, 6, 600.0),
            tracer_row("m1", 1, "B", 10, 2, 600.0),
            tracer_row("m1", 1, "C", 10, 4, 600.0),
        ];

        let z = |rows: &[PlayerStatRow], player: &str| {
            lookup(rows, "Tracer", player, &options(1))
                .unwrap()
                .column(StatColumn::Deaths)
                .and_then(|c| c.zscore)
                .unwrap()
        };

        let gap_before = z(&before, "A") - z(&before, "B");
        let gap_after = z(&after, "A") - z(&after, "B");
        assert!(gap_before > 0.0);
        assert!((gap_before + gap_after).abs() < 1e-9);
    }

    #[test]
    fn test_limit_applies_after_ranking() {
        let rows = vec![
            tracer_row("m1", 1, "Low", 5, 8, 600.0),
            tracer_row("m1", 1, "High", 20, 2, 600.0),
            tracer_row("m1", 1, "Mid", 10, 5, 600.0),
        ];
        let opts = LeaderboardOptions {
            limit: 1,
            ..options(1)
        };
        let board = leaderboard(&rows, "Tracer", &opts).unwrap();
        assert_eq!(board.population, 3);
        assert_eq!(board.rows.len(), 1);
        assert_eq!(board.rows[0].player_name, "High");
        assert_eq!(board.rows[0].percentile, 100.0);

        // Lookup still measures against the whole population.
        let low = lookup(&rows, "Tracer", "Low", &opts).unwrap();
        assert_eq!(low.rank, 3);
    }

    #[test]
    fn test_weight_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert(StatColumn::Eliminations, 1.0);
        overrides.insert(StatColumn::HealingDealt, 0.5);
        let weights = RoleWeights::default_for(Role::Damage).with_overrides(&overrides);

        let elims = weights
            .weights
            .iter()
            .find(|w| w.column == StatColumn::Eliminations)
            .unwrap();
        assert_eq!(elims.weight, 1.0);
        assert!(!weights.contains(StatColumn::HealingDealt));
    }

    #[test]
    fn test_default_weight_tables() {
        let tank = RoleWeights::default_for(Role::Tank);
        assert_eq!(tank.weights.len(), 8);
        let inverted: Vec<StatColumn> = tank
            .weights
            .iter()
            .filter(|w| w.inverted)
            .map(|w| w.column)
            .collect();
        assert_eq!(inverted, vec![StatColumn::Deaths, StatColumn::DamageTaken]);

        let support: f64 = RoleWeights::default_for(Role::Support)
            .weights
            .iter()
            .map(|w| w.weight)
            .sum();
        assert!((support - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_hero_and_missing_player() {
        let rows = vec![tracer_row("m1", 1, "Sparky", 20, 5, 600.0)];
        assert_eq!(
            leaderboard(&rows, "Nobody", &options(1)).unwrap_err(),
            AnalyticsError::UnknownHero("Nobody".to_string())
        );
        assert_eq!(
            lookup(&rows, "Tracer", "Halo", &options(1)).unwrap_err(),
            AnalyticsError::PlayerNotFound("Halo".to_string())
        );
    }
}
