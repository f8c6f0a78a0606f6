//! Statistics calculation engine.
//!
//! Computes derived metrics from one map's events or a pool of stat rows:
//! - Fight segmentation and fight-level rates
//! - Ultimate charge and hold timing
//! - Hero-versus-hero duels
//! - X-Factor impact score
//! - Composite SR leaderboards

pub mod composite_sr;
pub mod duels;
pub mod fights;
pub mod stat_rows;
pub mod ultimates;
pub mod xfactor;

pub use composite_sr::{leaderboard, lookup, rating, LeaderboardOptions, RoleWeights, StatWeight};
pub use duels::{aggregate, average_duel_win_rate, player_duels};
pub use fights::{
    fight_record, first_death_rate, first_pick_rate, fight_reversal_rate, group_kills_by_interval,
    map_fights, player_fights, segment, DEFAULT_FIGHT_GAP_SECONDS,
};
pub use stat_rows::{dedup_stat_rows, final_round_rows};
pub use ultimates::{average_charge_time, average_hold_time, ultimate_timing, UltimateTiming};
pub use xfactor::{XFactor, XFactorScorer};

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Per-10-minute rate from a total and the seconds it was earned over.
pub fn per_10(total: f64, seconds: f64) -> f64 {
    if seconds <= 0.0 {
        0.0
    } else {
        total / seconds * 600.0
    }
}
