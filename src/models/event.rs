//! Match log event model.
//!
//! A scrim log is a sequence of positional records, each led by a kind tag.
//! [`RawRecord`] is the untyped form; [`TypedEvent`] is what the schema turns
//! it into.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One untyped scalar from an exported log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),

    /// Unquoted text-log token; the schema decides whether it is a number
    #[serde(skip_deserializing)]
    Token(String),
}

impl RawField {
    /// Numeric value of a number, or of a token that reads as one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawField::Number(n) => Some(*n),
            RawField::Token(s) => s.parse().ok(),
            RawField::Text(_) => None,
        }
    }

    /// Text of a string or token, exactly as written.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawField::Text(s) | RawField::Token(s) => Some(s),
            RawField::Number(_) => None,
        }
    }
}

impl fmt::Display for RawField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawField::Number(n) => write!(f, "{}", n),
            RawField::Text(s) | RawField::Token(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<f64> for RawField {
    fn from(n: f64) -> Self {
        RawField::Number(n)
    }
}

impl From<i64> for RawField {
    fn from(n: i64) -> Self {
        RawField::Number(n as f64)
    }
}

impl From<&str> for RawField {
    fn from(s: &str) -> Self {
        RawField::Text(s.to_string())
    }
}

impl From<String> for RawField {
    fn from(s: String) -> Self {
        RawField::Text(s)
    }
}

/// An ordered list of untyped fields, excluding the leading kind tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(pub Vec<RawField>);

impl RawRecord {
    pub fn new(fields: Vec<RawField>) -> Self {
        Self(fields)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[RawField] {
        &self.0
    }
}

/// Every event kind the exporter writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    MatchStart,
    MatchEnd,
    RoundStart,
    RoundEnd,
    SetupComplete,
    ObjectiveCaptured,
    ObjectiveUpdated,
    PointProgress,
    PayloadProgress,
    Kill,
    Damage,
    Healing,
    MercyRez,
    OffensiveAssist,
    DefensiveAssist,
    HeroSpawn,
    HeroSwap,
    #[serde(rename = "ability_1_used")]
    Ability1Used,
    #[serde(rename = "ability_2_used")]
    Ability2Used,
    UltimateCharged,
    UltimateStart,
    UltimateEnd,
    DvaRemech,
    RemechCharged,
    EchoDuplicateStart,
    EchoDuplicateEnd,
    PlayerStat,
}

impl EventKind {
    pub const ALL: [EventKind; 27] = [
        EventKind::MatchStart,
        EventKind::MatchEnd,
        EventKind::RoundStart,
        EventKind::RoundEnd,
        EventKind::SetupComplete,
        EventKind::ObjectiveCaptured,
        EventKind::ObjectiveUpdated,
        EventKind::PointProgress,
        EventKind::PayloadProgress,
        EventKind::Kill,
        EventKind::Damage,
        EventKind::Healing,
        EventKind::MercyRez,
        EventKind::OffensiveAssist,
        EventKind::DefensiveAssist,
        EventKind::HeroSpawn,
        EventKind::HeroSwap,
        EventKind::Ability1Used,
        EventKind::Ability2Used,
        EventKind::UltimateCharged,
        EventKind::UltimateStart,
        EventKind::UltimateEnd,
        EventKind::DvaRemech,
        EventKind::RemechCharged,
        EventKind::EchoDuplicateStart,
        EventKind::EchoDuplicateEnd,
        EventKind::PlayerStat,
    ];

    /// The tag string used in exported logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MatchStart => "match_start",
            EventKind::MatchEnd => "match_end",
            EventKind::RoundStart => "round_start",
            EventKind::RoundEnd => "round_end",
            EventKind::SetupComplete => "setup_complete",
            EventKind::ObjectiveCaptured => "objective_captured",
            EventKind::ObjectiveUpdated => "objective_updated",
            EventKind::PointProgress => "point_progress",
            EventKind::PayloadProgress => "payload_progress",
            EventKind::Kill => "kill",
            EventKind::Damage => "damage",
            EventKind::Healing => "healing",
            EventKind::MercyRez => "mercy_rez",
            EventKind::OffensiveAssist => "offensive_assist",
            EventKind::DefensiveAssist => "defensive_assist",
            EventKind::HeroSpawn => "hero_spawn",
            EventKind::HeroSwap => "hero_swap",
            EventKind::Ability1Used => "ability_1_used",
            EventKind::Ability2Used => "ability_2_used",
            EventKind::UltimateCharged => "ultimate_charged",
            EventKind::UltimateStart => "ultimate_start",
            EventKind::UltimateEnd => "ultimate_end",
            EventKind::DvaRemech => "dva_remech",
            EventKind::RemechCharged => "remech_charged",
            EventKind::EchoDuplicateStart => "echo_duplicate_start",
            EventKind::EchoDuplicateEnd => "echo_duplicate_end",
            EventKind::PlayerStat => "player_stat",
        }
    }

    /// Look up a kind by its log tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == tag)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStart {
    pub match_time: f64,
    pub map_name: String,
    pub map_type: String,
    pub team_1_name: String,
    pub team_2_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEnd {
    pub match_time: f64,
    pub round_number: i64,
    pub team_1_score: i64,
    pub team_2_score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStart {
    pub match_time: f64,
    pub round_number: i64,
    pub capturing_team: String,
    pub team_1_score: i64,
    pub team_2_score: i64,
    pub objective_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundEnd {
    pub match_time: f64,
    pub round_number: i64,
    pub capturing_team: String,
    pub team_1_score: i64,
    pub team_2_score: i64,
    pub objective_index: i64,
    pub control_team_1_progress: f64,
    pub control_team_2_progress: f64,
    pub match_time_remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupComplete {
    pub match_time: f64,
    pub round_number: i64,
    pub match_time_remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveCaptured {
    pub match_time: f64,
    pub round_number: i64,
    pub capturing_team: String,
    pub objective_index: i64,
    pub control_team_1_progress: f64,
    pub control_team_2_progress: f64,
    pub match_time_remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveUpdated {
    pub match_time: f64,
    pub round_number: i64,
    pub previous_objective_index: i64,
    pub current_objective_index: i64,
}

/// Shared by `point_progress` and `payload_progress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    pub match_time: f64,
    pub round_number: i64,
    pub capturing_team: String,
    pub objective_index: i64,
    pub capture_progress: f64,
}

/// Shared by `kill` and `damage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub match_time: f64,
    pub attacker_team: String,
    pub attacker_name: String,
    pub attacker_hero: String,
    pub victim_team: String,
    pub victim_name: String,
    pub victim_hero: String,
    pub event_ability: String,
    pub event_damage: f64,
    pub is_critical_hit: bool,
    pub is_environmental: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealingEvent {
    pub match_time: f64,
    pub healer_team: String,
    pub healer_name: String,
    pub healer_hero: String,
    pub healee_team: String,
    pub healee_name: String,
    pub healee_hero: String,
    pub event_ability: String,
    pub event_healing: f64,
    pub is_health_pack: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MercyRez {
    pub match_time: f64,
    pub resurrecter_team: String,
    pub resurrecter_name: String,
    pub resurrecter_hero: String,
    pub resurrectee_team: String,
    pub resurrectee_name: String,
    pub resurrectee_hero: String,
}

/// Shared by assists and ability usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAction {
    pub match_time: f64,
    pub player_team: String,
    pub player_name: String,
    pub player_hero: String,
    pub hero_duplicated: String,
}

/// Shared by `hero_spawn` and `hero_swap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroChange {
    pub match_time: f64,
    pub player_team: String,
    pub player_name: String,
    pub player_hero: String,
    pub previous_hero: String,
    pub hero_time_played: f64,
}

/// Shared by the ultimate lifecycle kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UltimateEvent {
    pub match_time: f64,
    pub player_team: String,
    pub player_name: String,
    pub player_hero: String,
    pub hero_duplicated: String,
    pub ultimate_id: i64,
}

/// `dva_remech` and `echo_duplicate_end` carry no duplicated hero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UltimateLink {
    pub match_time: f64,
    pub player_team: String,
    pub player_name: String,
    pub player_hero: String,
    pub ultimate_id: i64,
}

/// Cumulative per-hero stats for one player at one round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStat {
    pub match_time: f64,
    pub round_number: i64,
    pub player_team: String,
    pub player_name: String,
    pub player_hero: String,
    pub eliminations: i64,
    pub final_blows: i64,
    pub deaths: i64,
    pub all_damage_dealt: f64,
    pub barrier_damage_dealt: f64,
    pub hero_damage_dealt: f64,
    pub healing_dealt: f64,
    pub healing_received: f64,
    pub self_healing: f64,
    pub damage_taken: f64,
    pub damage_blocked: f64,
    pub defensive_assists: i64,
    pub offensive_assists: i64,
    pub ultimates_earned: i64,
    pub ultimates_used: i64,
    pub multikill_best: i64,
    pub multikills: i64,
    pub solo_kills: i64,
    pub objective_kills: i64,
    pub environmental_kills: i64,
    pub environmental_deaths: i64,
    pub critical_hits: i64,
    pub critical_hit_accuracy: f64,
    pub scoped_accuracy: f64,
    pub scoped_critical_hit_accuracy: f64,
    pub scoped_critical_hit_kills: i64,
    pub shots_fired: i64,
    pub shots_hit: i64,
    pub shots_missed: i64,
    pub scoped_shots: i64,
    pub scoped_shots_hit: i64,
    pub weapon_accuracy: f64,
    pub hero_time_played: f64,
}

/// A validated log event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum TypedEvent {
    MatchStart(MatchStart),
    MatchEnd(MatchEnd),
    RoundStart(RoundStart),
    RoundEnd(RoundEnd),
    SetupComplete(SetupComplete),
    ObjectiveCaptured(ObjectiveCaptured),
    ObjectiveUpdated(ObjectiveUpdated),
    PointProgress(ObjectiveProgress),
    PayloadProgress(ObjectiveProgress),
    Kill(CombatEvent),
    Damage(CombatEvent),
    Healing(HealingEvent),
    MercyRez(MercyRez),
    OffensiveAssist(PlayerAction),
    DefensiveAssist(PlayerAction),
    HeroSpawn(HeroChange),
    HeroSwap(HeroChange),
    #[serde(rename = "ability_1_used")]
    Ability1Used(PlayerAction),
    #[serde(rename = "ability_2_used")]
    Ability2Used(PlayerAction),
    UltimateCharged(UltimateEvent),
    UltimateStart(UltimateEvent),
    UltimateEnd(UltimateEvent),
    DvaRemech(UltimateLink),
    RemechCharged(UltimateEvent),
    EchoDuplicateStart(UltimateEvent),
    EchoDuplicateEnd(UltimateLink),
    PlayerStat(PlayerStat),
}

impl TypedEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            TypedEvent::MatchStart(_) => EventKind::MatchStart,
            TypedEvent::MatchEnd(_) => EventKind::MatchEnd,
            TypedEvent::RoundStart(_) => EventKind::RoundStart,
            TypedEvent::RoundEnd(_) => EventKind::RoundEnd,
            TypedEvent::SetupComplete(_) => EventKind::SetupComplete,
            TypedEvent::ObjectiveCaptured(_) => EventKind::ObjectiveCaptured,
            TypedEvent::ObjectiveUpdated(_) => EventKind::ObjectiveUpdated,
            TypedEvent::PointProgress(_) => EventKind::PointProgress,
            TypedEvent::PayloadProgress(_) => EventKind::PayloadProgress,
            TypedEvent::Kill(_) => EventKind::Kill,
            TypedEvent::Damage(_) => EventKind::Damage,
            TypedEvent::Healing(_) => EventKind::Healing,
            TypedEvent::MercyRez(_) => EventKind::MercyRez,
            TypedEvent::OffensiveAssist(_) => EventKind::OffensiveAssist,
            TypedEvent::DefensiveAssist(_) => EventKind::DefensiveAssist,
            TypedEvent::HeroSpawn(_) => EventKind::HeroSpawn,
            TypedEvent::HeroSwap(_) => EventKind::HeroSwap,
            TypedEvent::Ability1Used(_) => EventKind::Ability1Used,
            TypedEvent::Ability2Used(_) => EventKind::Ability2Used,
            TypedEvent::UltimateCharged(_) => EventKind::UltimateCharged,
            TypedEvent::UltimateStart(_) => EventKind::UltimateStart,
            TypedEvent::UltimateEnd(_) => EventKind::UltimateEnd,
            TypedEvent::DvaRemech(_) => EventKind::DvaRemech,
            TypedEvent::RemechCharged(_) => EventKind::RemechCharged,
            TypedEvent::EchoDuplicateStart(_) => EventKind::EchoDuplicateStart,
            TypedEvent::EchoDuplicateEnd(_) => EventKind::EchoDuplicateEnd,
            TypedEvent::PlayerStat(_) => EventKind::PlayerStat,
        }
    }

    /// Match clock in seconds.
    pub fn match_time(&self) -> f64 {
        match self {
            TypedEvent::MatchStart(e) => e.match_time,
            TypedEvent::MatchEnd(e) => e.match_time,
            TypedEvent::RoundStart(e) => e.match_time,
            TypedEvent::RoundEnd(e) => e.match_time,
            TypedEvent::SetupComplete(e) => e.match_time,
            TypedEvent::ObjectiveCaptured(e) => e.match_time,
            TypedEvent::ObjectiveUpdated(e) => e.match_time,
            TypedEvent::PointProgress(e) | TypedEvent::PayloadProgress(e) => e.match_time,
            TypedEvent::Kill(e) | TypedEvent::Damage(e) => e.match_time,
            TypedEvent::Healing(e) => e.match_time,
            TypedEvent::MercyRez(e) => e.match_time,
            TypedEvent::OffensiveAssist(e)
            | TypedEvent::DefensiveAssist(e)
            | TypedEvent::Ability1Used(e)
            | TypedEvent::Ability2Used(e) => e.match_time,
            TypedEvent::HeroSpawn(e) | TypedEvent::HeroSwap(e) => e.match_time,
            TypedEvent::UltimateCharged(e)
            | TypedEvent::UltimateStart(e)
            | TypedEvent::UltimateEnd(e)
            | TypedEvent::RemechCharged(e)
            | TypedEvent::EchoDuplicateStart(e) => e.match_time,
            TypedEvent::DvaRemech(e) | TypedEvent::EchoDuplicateEnd(e) => e.match_time,
            TypedEvent::PlayerStat(e) => e.match_time,
        }
    }

    /// Round number for kinds that carry one.
    pub fn round_number(&self) -> Option<i64> {
        match self {
            TypedEvent::MatchEnd(e) => Some(e.round_number),
            TypedEvent::RoundStart(e) => Some(e.round_number),
            TypedEvent::RoundEnd(e) => Some(e.round_number),
            TypedEvent::SetupComplete(e) => Some(e.round_number),
            TypedEvent::ObjectiveCaptured(e) => Some(e.round_number),
            TypedEvent::ObjectiveUpdated(e) => Some(e.round_number),
            TypedEvent::PointProgress(e) | TypedEvent::PayloadProgress(e) => Some(e.round_number),
            TypedEvent::PlayerStat(e) => Some(e.round_number),
            _ => None,
        }
    }

    /// Every player name the event refers to.
    pub fn player_names(&self) -> Vec<&str> {
        match self {
            TypedEvent::Kill(e) | TypedEvent::Damage(e) => {
                vec![e.attacker_name.as_str(), e.victim_name.as_str()]
            }
            TypedEvent::Healing(e) => vec![e.healer_name.as_str(), e.healee_name.as_str()],
            TypedEvent::MercyRez(e) => {
                vec![e.resurrecter_name.as_str(), e.resurrectee_name.as_str()]
            }
            TypedEvent::OffensiveAssist(e)
            | TypedEvent::DefensiveAssist(e)
            | TypedEvent::Ability1Used(e)
            | TypedEvent::Ability2Used(e) => vec![e.player_name.as_str()],
            TypedEvent::HeroSpawn(e) | TypedEvent::HeroSwap(e) => vec![e.player_name.as_str()],
            TypedEvent::UltimateCharged(e)
            | TypedEvent::UltimateStart(e)
            | TypedEvent::UltimateEnd(e)
            | TypedEvent::RemechCharged(e)
            | TypedEvent::EchoDuplicateStart(e) => vec![e.player_name.as_str()],
            TypedEvent::DvaRemech(e) | TypedEvent::EchoDuplicateEnd(e) => {
                vec![e.player_name.as_str()]
            }
            TypedEvent::PlayerStat(e) => vec![e.player_name.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn involves_player(&self, player: &str) -> bool {
        self.player_names().contains(&player)
    }
}
