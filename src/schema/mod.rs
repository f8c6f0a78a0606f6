//! Event schema: validates positional raw records into typed events.
//!
//! Each kind has a fixed layout (see [`layout`]). Records with the wrong
//! arity, a field that fails coercion, or an unknown kind are rejected with a
//! [`ValidationError`]; nothing is dropped or repaired here.

mod fields;
mod reader;

pub use fields::{layout, FieldKind, FieldSpec};
pub use reader::FieldReader;

use serde::Serialize;
use thiserror::Error;

use crate::models::{
    CombatEvent, EventKind, HealingEvent, HeroChange, MatchEnd, MatchStart, MercyRez,
    ObjectiveCaptured, ObjectiveProgress, ObjectiveUpdated, PlayerAction, PlayerStat, RawField,
    RawRecord, RoundEnd, RoundStart, SetupComplete, TypedEvent, UltimateEvent, UltimateLink,
};

/// A raw record that does not match its kind's layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{path}: {message}")]
pub struct ValidationError {
    /// `kind[index].field` for field errors, `kind` for arity errors
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Validate `raw` as an event of kind `kind`.
pub fn parse(kind: &str, raw: &RawRecord) -> Result<TypedEvent, ValidationError> {
    let kind = EventKind::from_tag(kind).ok_or_else(|| {
        ValidationError::new("kind", format!("unrecognized event kind {:?}", kind))
    })?;
    parse_kind(kind, raw)
}

/// Validate a record whose first field is the kind tag.
pub fn parse_tagged(raw: &RawRecord) -> Result<TypedEvent, ValidationError> {
    let (tag, rest) = match raw.fields().split_first() {
        Some((RawField::Text(tag) | RawField::Token(tag), rest)) => (tag, rest),
        Some((other, _)) => {
            return Err(ValidationError::new(
                "kind",
                format!("expected an event kind, found {}", other),
            ))
        }
        None => return Err(ValidationError::new("kind", "empty record")),
    };
    parse(tag, &RawRecord::new(rest.to_vec()))
}

/// Validate `raw` against an already resolved kind.
pub fn parse_kind(kind: EventKind, raw: &RawRecord) -> Result<TypedEvent, ValidationError> {
    let mut r = FieldReader::new(kind, raw)?;

    let event = match kind {
        EventKind::MatchStart => TypedEvent::MatchStart(MatchStart {
            match_time: r.float("match_time")?,
            map_name: r.text("map_name")?,
            map_type: r.text("map_type")?,
            team_1_name: r.text_or_number("team_1_name")?,
            team_2_name: r.text_or_number("team_2_name")?,
        }),
        EventKind::MatchEnd => TypedEvent::MatchEnd(MatchEnd {
            match_time: r.float("match_time")?,
            round_number: r.integer("round_number")?,
            team_1_score: r.integer("team_1_score")?,
            team_2_score: r.integer("team_2_score")?,
        }),
        EventKind::RoundStart => TypedEvent::RoundStart(RoundStart {
            match_time: r.float("match_time")?,
            round_number: r.integer("round_number")?,
            capturing_team: r.text_or_number("capturing_team")?,
            team_1_score: r.integer("team_1_score")?,
            team_2_score: r.integer("team_2_score")?,
            objective_index: r.integer("objective_index")?,
        }),
        EventKind::RoundEnd => TypedEvent::RoundEnd(RoundEnd {
            match_time: r.float("match_time")?,
            round_number: r.integer("round_number")?,
            capturing_team: r.text_or_number("capturing_team")?,
            team_1_score: r.integer("team_1_score")?,
            team_2_score: r.integer("team_2_score")?,
            objective_index: r.integer("objective_index")?,
            control_team_1_progress: r.float("control_team_1_progress")?,
            control_team_2_progress: r.float("control_team_2_progress")?,
            match_time_remaining: r.float("match_time_remaining")?,
        }),
        EventKind::SetupComplete => TypedEvent::SetupComplete(SetupComplete {
            match_time: r.float("match_time")?,
            round_number: r.integer("round_number")?,
            match_time_remaining: r.float("match_time_remaining")?,
        }),
        EventKind::ObjectiveCaptured => TypedEvent::ObjectiveCaptured(ObjectiveCaptured {
            match_time: r.float("match_time")?,
            round_number: r.integer("round_number")?,
            capturing_team: r.text_or_number("capturing_team")?,
            objective_index: r.integer("objective_index")?,
            control_team_1_progress: r.float("control_team_1_progress")?,
            control_team_2_progress: r.float("control_team_2_progress")?,
            match_time_remaining: r.float("match_time_remaining")?,
        }),
        EventKind::ObjectiveUpdated => TypedEvent::ObjectiveUpdated(ObjectiveUpdated {
            match_time: r.float("match_time")?,
            round_number: r.integer("round_number")?,
            previous_objective_index: r.integer("previous_objective_index")?,
            current_objective_index: r.integer("current_objective_index")?,
        }),
        EventKind::PointProgress => {
            TypedEvent::PointProgress(objective_progress(&mut r, "point_capture_progress")?)
        }
        EventKind::PayloadProgress => {
            TypedEvent::PayloadProgress(objective_progress(&mut r, "payload_capture_progress")?)
        }
        EventKind::Kill => TypedEvent::Kill(combat(&mut r)?),
        EventKind::Damage => TypedEvent::Damage(combat(&mut r)?),
        EventKind::Healing => TypedEvent::Healing(HealingEvent {
            match_time: r.float("match_time")?,
            healer_team: r.text_or_number("healer_team")?,
            healer_name: r.text_or_number("healer_name")?,
            healer_hero: r.text("healer_hero")?,
            healee_team: r.text_or_number("healee_team")?,
            healee_name: r.text_or_number("healee_name")?,
            healee_hero: r.text("healee_hero")?,
            event_ability: r.text_or_number("event_ability")?,
            event_healing: r.float("event_healing")?,
            is_health_pack: r.flag("is_health_pack")?,
        }),
        EventKind::MercyRez => TypedEvent::MercyRez(MercyRez {
            match_time: r.float("match_time")?,
            resurrecter_team: r.text_or_number("resurrecter_team")?,
            resurrecter_name: r.text_or_number("resurrecter_name")?,
            resurrecter_hero: r.text("resurrecter_hero")?,
            resurrectee_team: r.text_or_number("resurrectee_team")?,
            resurrectee_name: r.text_or_number("resurrectee_name")?,
            resurrectee_hero: r.text("resurrectee_hero")?,
        }),
        EventKind::OffensiveAssist => TypedEvent::OffensiveAssist(player_action(&mut r)?),
        EventKind::DefensiveAssist => TypedEvent::DefensiveAssist(player_action(&mut r)?),
        EventKind::Ability1Used => TypedEvent::Ability1Used(player_action(&mut r)?),
        EventKind::Ability2Used => TypedEvent::Ability2Used(player_action(&mut r)?),
        EventKind::HeroSpawn => TypedEvent::HeroSpawn(hero_change(&mut r)?),
        EventKind::HeroSwap => TypedEvent::HeroSwap(hero_change(&mut r)?),
        EventKind::UltimateCharged => TypedEvent::UltimateCharged(ultimate(&mut r)?),
        EventKind::UltimateStart => TypedEvent::UltimateStart(ultimate(&mut r)?),
        EventKind::UltimateEnd => TypedEvent::UltimateEnd(ultimate(&mut r)?),
        EventKind::RemechCharged => TypedEvent::RemechCharged(ultimate(&mut r)?),
        EventKind::EchoDuplicateStart => TypedEvent::EchoDuplicateStart(ultimate(&mut r)?),
        EventKind::DvaRemech => TypedEvent::DvaRemech(ultimate_link(&mut r)?),
        EventKind::EchoDuplicateEnd => TypedEvent::EchoDuplicateEnd(ultimate_link(&mut r)?),
        EventKind::PlayerStat => TypedEvent::PlayerStat(player_stat(&mut r)?),
    };

    debug_assert!(r.is_exhausted(), "{} left fields unread", kind);
    Ok(event)
}

fn objective_progress(
    r: &mut FieldReader<'_>,
    progress_field: &str,
) -> Result<ObjectiveProgress, ValidationError> {
    Ok(ObjectiveProgress {
        match_time: r.float("match_time")?,
        round_number: r.integer("round_number")?,
        capturing_team: r.text_or_number("capturing_team")?,
        objective_index: r.integer("objective_index")?,
        capture_progress: r.float(progress_field)?,
    })
}

fn combat(r: &mut FieldReader<'_>) -> Result<CombatEvent, ValidationError> {
    Ok(CombatEvent {
        match_time: r.float("match_time")?,
        attacker_team: r.text_or_number("attacker_team")?,
        attacker_name: r.text_or_number("attacker_name")?,
        attacker_hero: r.text("attacker_hero")?,
        victim_team: r.text_or_number("victim_team")?,
        victim_name: r.text_or_number("victim_name")?,
        victim_hero: r.text("victim_hero")?,
        event_ability: r.text_or_number("event_ability")?,
        event_damage: r.float("event_damage")?,
        is_critical_hit: r.flag("is_critical_hit")?,
        is_environmental: r.flag("is_environmental")?,
    })
}

fn player_action(r: &mut FieldReader<'_>) -> Result<PlayerAction, ValidationError> {
    Ok(PlayerAction {
        match_time: r.float("match_time")?,
        player_team: r.text_or_number("player_team")?,
        player_name: r.text_or_number("player_name")?,
        player_hero: r.text("player_hero")?,
        hero_duplicated: r.text_or_number("hero_duplicated")?,
    })
}

fn hero_change(r: &mut FieldReader<'_>) -> Result<HeroChange, ValidationError> {
    Ok(HeroChange {
        match_time: r.float("match_time")?,
        player_team: r.text_or_number("player_team")?,
        player_name: r.text_or_number("player_name")?,
        player_hero: r.text("player_hero")?,
        previous_hero: r.text_or_number("previous_hero")?,
        hero_time_played: r.float("hero_time_played")?,
    })
}

fn ultimate(r: &mut FieldReader<'_>) -> Result<UltimateEvent, ValidationError> {
    Ok(UltimateEvent {
        match_time: r.float("match_time")?,
        player_team: r.text_or_number("player_team")?,
        player_name: r.text_or_number("player_name")?,
        player_hero: r.text("player_hero")?,
        hero_duplicated: r.text_or_number("hero_duplicated")?,
        ultimate_id: r.integer("ultimate_id")?,
    })
}

fn ultimate_link(r: &mut FieldReader<'_>) -> Result<UltimateLink, ValidationError> {
    Ok(UltimateLink {
        match_time: r.float("match_time")?,
        player_team: r.text_or_number("player_team")?,
        player_name: r.text_or_number("player_name")?,
        player_hero: r.text("player_hero")?,
        ultimate_id: r.integer("ultimate_id")?,
    })
}

fn player_stat(r: &mut FieldReader<'_>) -> Result<PlayerStat, ValidationError> {
    Ok(PlayerStat {
        match_time: r.float("match_time")?,
        round_number: r.integer("round_number")?,
        player_team: r.text_or_number("player_team")?,
        player_name: r.text_or_number("player_name")?,
        player_hero: r.text("player_hero")?,
        eliminations: r.integer("eliminations")?,
        final_blows: r.integer("final_blows")?,
        deaths: r.integer("deaths")?,
        all_damage_dealt: r.float("all_damage_dealt")?,
        barrier_damage_dealt: r.float("barrier_damage_dealt")?,
        hero_damage_dealt: r.float("hero_damage_dealt")?,
        healing_dealt: r.float("healing_dealt")?,
        healing_received: r.float("healing_received")?,
        self_healing: r.float("self_healing")?,
        damage_taken: r.float("damage_taken")?,
        damage_blocked: r.float("damage_blocked")?,
        defensive_assists: r.integer("defensive_assists")?,
        offensive_assists: r.integer("offensive_assists")?,
        ultimates_earned: r.integer("ultimates_earned")?,
        ultimates_used: r.integer("ultimates_used")?,
        multikill_best: r.integer("multikill_best")?,
        multikills: r.integer("multikills")?,
        solo_kills: r.integer("solo_kills")?,
        objective_kills: r.integer("objective_kills")?,
        environmental_kills: r.integer("environmental_kills")?,
        environmental_deaths: r.integer("environmental_deaths")?,
        critical_hits: r.integer("critical_hits")?,
        critical_hit_accuracy: r.float("critical_hit_accuracy")?,
        scoped_accuracy: r.float("scoped_accuracy")?,
        scoped_critical_hit_accuracy: r.float("scoped_critical_hit_accuracy")?,
        scoped_critical_hit_kills: r.integer("scoped_critical_hit_kills")?,
        shots_fired: r.integer("shots_fired")?,
        shots_hit: r.integer("shots_hit")?,
        shots_missed: r.integer("shots_missed")?,
        scoped_shots: r.integer("scoped_shots")?,
        scoped_shots_hit: r.integer("scoped_shots_hit")?,
        weapon_accuracy: r.float("weapon_accuracy")?,
        hero_time_played: r.float("hero_time_played")?,
    })
}
