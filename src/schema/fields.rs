//! Canonical positional layout of every event kind.

use serde::Serialize;

use crate::models::EventKind;

/// How a positional field is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Finite number
    Float,
    /// Number with no fractional part
    Integer,
    /// Text only
    Text,
    /// Text, or a number normalised to its decimal text
    TextOrNumber,
    /// The strings `"True"` / `"False"`
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

use FieldKind::{Flag, Float, Integer, Text, TextOrNumber};

static MATCH_START: &[FieldSpec] = &[
    field("match_time", Float),
    field("map_name", Text),
    field("map_type", Text),
    field("team_1_name", TextOrNumber),
    field("team_2_name", TextOrNumber),
];

static MATCH_END: &[FieldSpec] = &[
    field("match_time", Float),
    field("round_number", Integer),
    field("team_1_score", Integer),
    field("team_2_score", Integer),
];

static ROUND_START: &[FieldSpec] = &[
    field("match_time", Float),
    field("round_number", Integer),
    field("capturing_team", TextOrNumber),
    field("team_1_score", Integer),
    field("team_2_score", Integer),
    field("objective_index", Integer),
];

static ROUND_END: &[FieldSpec] = &[
    field("match_time", Float),
    field("round_number", Integer),
    field("capturing_team", TextOrNumber),
    field("team_1_score", Integer),
    field("team_2_score", Integer),
    field("objective_index", Integer),
    field("control_team_1_progress", Float),
    field("control_team_2_progress", Float),
    field("match_time_remaining", Float),
];

static SETUP_COMPLETE: &[FieldSpec] = &[
    field("match_time", Float),
    field("round_number", Integer),
    field("match_time_remaining", Float),
];

static OBJECTIVE_CAPTURED: &[FieldSpec] = &[
    field("match_time", Float),
    field("round_number", Integer),
    field("capturing_team", TextOrNumber),
    field("objective_index", Integer),
    field("control_team_1_progress", Float),
    field("control_team_2_progress", Float),
    field("match_time_remaining", Float),
];

static OBJECTIVE_UPDATED: &[FieldSpec] = &[
    field("match_time", Float),
    field("round_number", Integer),
    field("previous_objective_index", Integer),
    field("current_objective_index", Integer),
];

static POINT_PROGRESS: &[FieldSpec] = &[
    field("match_time", Float),
    field("round_number", Integer),
    field("capturing_team", TextOrNumber),
    field("objective_index", Integer),
    field("point_capture_progress", Float),
];

static PAYLOAD_PROGRESS: &[FieldSpec] = &[
    field("match_time", Float),
    field("round_number", Integer),
    field("capturing_team", TextOrNumber),
    field("objective_index", Integer),
    field("payload_capture_progress", Float),
];

static COMBAT: &[FieldSpec] = &[
    field("match_time", Float),
    field("attacker_team", TextOrNumber),
    field("attacker_name", TextOrNumber),
    field("attacker_hero", Text),
    field("victim_team", TextOrNumber),
    field("victim_name", TextOrNumber),
    field("victim_hero", Text),
    field("event_ability", TextOrNumber),
    field("event_damage", Float),
    field("is_critical_hit", Flag),
    field("is_environmental", Flag),
];

static HEALING: &[FieldSpec] = &[
    field("match_time", Float),
    field("healer_team", TextOrNumber),
    field("healer_name", TextOrNumber),
    field("healer_hero", Text),
    field("healee_team", TextOrNumber),
    field("healee_name", TextOrNumber),
    field("healee_hero", Text),
    field("event_ability", TextOrNumber),
    field("event_healing", Float),
    field("is_health_pack", Flag),
];

static MERCY_REZ: &[FieldSpec] = &[
    field("match_time", Float),
    field("resurrecter_team", TextOrNumber),
    field("resurrecter_name", TextOrNumber),
    field("resurrecter_hero", Text),
    field("resurrectee_team", TextOrNumber),
    field("resurrectee_name", TextOrNumber),
    field("resurrectee_hero", Text),
];

static PLAYER_ACTION: &[FieldSpec] = &[
    field("match_time", Float),
    field("player_team", TextOrNumber),
    field("player_name", TextOrNumber),
    field("player_hero", Text),
    field("hero_duplicated", TextOrNumber),
];

static HERO_CHANGE: &[FieldSpec] = &[
    field("match_time", Float),
    field("player_team", TextOrNumber),
    field("player_name", TextOrNumber),
    field("player_hero", Text),
    field("previous_hero", TextOrNumber),
    field("hero_time_played", Float),
];

static ULTIMATE: &[FieldSpec] = &[
    field("match_time", Float),
    field("player_team", TextOrNumber),
    field("player_name", TextOrNumber),
    field("player_hero", Text),
    field("hero_duplicated", TextOrNumber),
    field("ultimate_id", Integer),
];

static ULTIMATE_LINK: &[FieldSpec] = &[
    field("match_time", Float),
    field("player_team", TextOrNumber),
    field("player_name", TextOrNumber),
    field("player_hero", Text),
    field("ultimate_id", Integer),
];

static PLAYER_STAT: &[FieldSpec] = &[
    field("match_time", Float),
    field("round_number", Integer),
    field("player_team", TextOrNumber),
    field("player_name", TextOrNumber),
    field("player_hero", Text),
    field("eliminations", Integer),
    field("final_blows", Integer),
    field("deaths", Integer),
    field("all_damage_dealt", Float),
    field("barrier_damage_dealt", Float),
    field("hero_damage_dealt", Float),
    field("healing_dealt", Float),
    field("healing_received", Float),
    field("self_healing", Float),
    field("damage_taken", Float),
    field("damage_blocked", Float),
    field("defensive_assists", Integer),
    field("offensive_assists", Integer),
    field("ultimates_earned", Integer),
    field("ultimates_used", Integer),
    field("multikill_best", Integer),
    field("multikills", Integer),
    field("solo_kills", Integer),
    field("objective_kills", Integer),
    field("environmental_kills", Integer),
    field("environmental_deaths", Integer),
    field("critical_hits", Integer),
    field("critical_hit_accuracy", Float),
    field("scoped_accuracy", Float),
    field("scoped_critical_hit_accuracy", Float),
    field("scoped_critical_hit_kills", Integer),
    field("shots_fired", Integer),
    field("shots_hit", Integer),
    field("shots_missed", Integer),
    field("scoped_shots", Integer),
    field("scoped_shots_hit", Integer),
    field("weapon_accuracy", Float),
    field("hero_time_played", Float),
];

/// Ordered field layout for `kind`.
pub fn layout(kind: EventKind) -> &'static [FieldSpec] {
    match kind {
        EventKind::MatchStart => MATCH_START,
        EventKind::MatchEnd => MATCH_END,
        EventKind::RoundStart => ROUND_START,
        EventKind::RoundEnd => ROUND_END,
        EventKind::SetupComplete => SETUP_COMPLETE,
        EventKind::ObjectiveCaptured => OBJECTIVE_CAPTURED,
        EventKind::ObjectiveUpdated => OBJECTIVE_UPDATED,
        EventKind::PointProgress => POINT_PROGRESS,
        EventKind::PayloadProgress => PAYLOAD_PROGRESS,
        EventKind::Kill | EventKind::Damage => COMBAT,
        EventKind::Healing => HEALING,
        EventKind::MercyRez => MERCY_REZ,
        EventKind::OffensiveAssist
        | EventKind::DefensiveAssist
        | EventKind::Ability1Used
        | EventKind::Ability2Used => PLAYER_ACTION,
        EventKind::HeroSpawn | EventKind::HeroSwap => HERO_CHANGE,
        EventKind::UltimateCharged
        | EventKind::UltimateStart
        | EventKind::UltimateEnd
        | EventKind::RemechCharged
        | EventKind::EchoDuplicateStart => ULTIMATE,
        EventKind::DvaRemech | EventKind::EchoDuplicateEnd => ULTIMATE_LINK,
        EventKind::PlayerStat => PLAYER_STAT,
    }
}
