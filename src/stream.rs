//! Ordered, immutable event sequence for one map.

use serde::Serialize;

use crate::models::{
    CombatEvent, EventKind, MapId, MatchStart, PlayerStat, PlayerStatRow, RoundEnd, TypedEvent,
    UltimateEvent,
};

/// Events for one played map, kept in log order.
#[derive(Debug, Clone, Serialize)]
pub struct EventStream {
    map_id: MapId,
    events: Vec<TypedEvent>,
}

impl EventStream {
    pub fn new(map_id: MapId, events: Vec<TypedEvent>) -> Self {
        Self { map_id, events }
    }

    pub fn map_id(&self) -> &MapId {
        &self.map_id
    }

    pub fn events(&self) -> &[TypedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn by_kind(&self, kind: EventKind) -> impl Iterator<Item = &TypedEvent> + '_ {
        self.events.iter().filter(move |e| e.kind() == kind)
    }

    /// Events with `from <= match_time <= to`.
    pub fn in_time_range(&self, from: f64, to: f64) -> impl Iterator<Item = &TypedEvent> + '_ {
        self.events
            .iter()
            .filter(move |e| e.match_time() >= from && e.match_time() <= to)
    }

    pub fn by_player<'a>(&'a self, player: &'a str) -> impl Iterator<Item = &'a TypedEvent> + 'a {
        self.events.iter().filter(move |e| e.involves_player(player))
    }

    pub fn match_start(&self) -> Option<&MatchStart> {
        self.events.iter().find_map(|e| match e {
            TypedEvent::MatchStart(m) => Some(m),
            _ => None,
        })
    }

    /// Team names as declared by `match_start`.
    pub fn team_names(&self) -> Option<(&str, &str)> {
        self.match_start()
            .map(|m| (m.team_1_name.as_str(), m.team_2_name.as_str()))
    }

    pub fn kills(&self) -> Vec<&CombatEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TypedEvent::Kill(k) => Some(k),
                _ => None,
            })
            .collect()
    }

    /// Kills scored by `player`.
    pub fn kills_by(&self, player: &str) -> Vec<&CombatEvent> {
        self.kills()
            .into_iter()
            .filter(|k| k.attacker_name == player)
            .collect()
    }

    /// Kills suffered by `player`.
    pub fn deaths_of(&self, player: &str) -> Vec<&CombatEvent> {
        self.kills()
            .into_iter()
            .filter(|k| k.victim_name == player)
            .collect()
    }

    /// Round-end records in log order.
    pub fn rounds(&self) -> Vec<&RoundEnd> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TypedEvent::RoundEnd(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    /// Round an event at `match_time` belongs to: the first round whose end
    /// is at or after it, falling back to the last round.
    pub fn round_at(&self, match_time: f64) -> Option<i64> {
        round_for(&self.rounds(), match_time)
    }

    /// Events falling inside the given round's start/end boundaries.
    pub fn in_round(&self, round_number: i64) -> Vec<&TypedEvent> {
        let start = self.events.iter().find_map(|e| match e {
            TypedEvent::RoundStart(r) if r.round_number == round_number => Some(r.match_time),
            _ => None,
        });
        let end = self.events.iter().find_map(|e| match e {
            TypedEvent::RoundEnd(r) if r.round_number == round_number => Some(r.match_time),
            _ => None,
        });

        match (start, end) {
            (Some(start), end) => self
                .in_time_range(start, end.unwrap_or(f64::INFINITY))
                .collect(),
            (None, _) => Vec::new(),
        }
    }

    fn ultimates(&self, kind: EventKind, player: &str) -> Vec<&UltimateEvent> {
        self.events
            .iter()
            .filter(|e| e.kind() == kind)
            .filter_map(|e| match e {
                TypedEvent::UltimateCharged(u)
                | TypedEvent::UltimateStart(u)
                | TypedEvent::UltimateEnd(u) => Some(u),
                _ => None,
            })
            .filter(|u| u.player_name == player)
            .collect()
    }

    pub fn ultimate_charges(&self, player: &str) -> Vec<&UltimateEvent> {
        self.ultimates(EventKind::UltimateCharged, player)
    }

    pub fn ultimate_starts(&self, player: &str) -> Vec<&UltimateEvent> {
        self.ultimates(EventKind::UltimateStart, player)
    }

    pub fn ultimate_ends(&self, player: &str) -> Vec<&UltimateEvent> {
        self.ultimates(EventKind::UltimateEnd, player)
    }

    pub fn player_stats(&self) -> Vec<&PlayerStat> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TypedEvent::PlayerStat(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// `player_stat` events as rows tagged with this map.
    pub fn stat_rows(&self) -> Vec<PlayerStatRow> {
        self.player_stats()
            .into_iter()
            .map(|s| PlayerStatRow::new(self.map_id.clone(), s.clone()))
            .collect()
    }

    /// True when match time never decreases along the stream.
    pub fn is_time_ordered(&self) -> bool {
        self.events
            .windows(2)
            .all(|w| w[0].match_time() <= w[1].match_time())
    }
}

/// Round lookup over pre-collected round-end records; see
/// [`EventStream::round_at`].
pub fn round_for(rounds: &[&RoundEnd], match_time: f64) -> Option<i64> {
    rounds
        .iter()
        .filter(|r| r.match_time >= match_time)
        .min_by(|a, b| a.match_time.total_cmp(&b.match_time))
        .or_else(|| rounds.iter().max_by_key(|r| r.round_number))
        .map(|r| r.round_number)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Event builders shared by calculation tests.

    use crate::models::*;

    pub fn kill(time: f64, attacker: (&str, &str, &str), victim: (&str, &str, &str)) -> TypedEvent {
        TypedEvent::Kill(CombatEvent {
            match_time: time,
            attacker_team: attacker.0.to_string(),
            attacker_name: attacker.1.to_string(),
            attacker_hero: attacker.2.to_string(),
            victim_team: victim.0.to_string(),
            victim_name: victim.1.to_string(),
            victim_hero: victim.2.to_string(),
            event_ability: "Primary Fire".to_string(),
            event_damage: 50.0,
            is_critical_hit: false,
            is_environmental: false,
        })
    }

    pub fn ultimate(kind: EventKind, time: f64, player: &str) -> TypedEvent {
        let event = UltimateEvent {
            match_time: time,
            player_team: "A".to_string(),
            player_name: player.to_string(),
            player_hero: "Tracer".to_string(),
            hero_duplicated: "0".to_string(),
            ultimate_id: 1,
        };
        match kind {
            EventKind::UltimateCharged => TypedEvent::UltimateCharged(event),
            EventKind::UltimateStart => TypedEvent::UltimateStart(event),
            EventKind::UltimateEnd => TypedEvent::UltimateEnd(event),
            other => panic!("not an ultimate kind: {}", other),
        }
    }

    pub fn round_start(time: f64, round_number: i64) -> TypedEvent {
        TypedEvent::RoundStart(RoundStart {
            match_time: time,
            round_number,
            capturing_team: "A".to_string(),
            team_1_score: 0,
            team_2_score: 0,
            objective_index: 0,
        })
    }

    pub fn round_end(time: f64, round_number: i64) -> TypedEvent {
        TypedEvent::RoundEnd(RoundEnd {
            match_time: time,
            round_number,
            capturing_team: "A".to_string(),
            team_1_score: 0,
            team_2_score: 0,
            objective_index: 0,
            control_team_1_progress: 0.0,
            control_team_2_progress: 0.0,
            match_time_remaining: 0.0,
        })
    }

    pub fn match_start(team_1: &str, team_2: &str) -> TypedEvent {
        TypedEvent::MatchStart(MatchStart {
            match_time: 0.0,
            map_name: "Ilios".to_string(),
            map_type: "Control".to_string(),
            team_1_name: team_1.to_string(),
            team_2_name: team_2.to_string(),
        })
    }

    pub fn stream(events: Vec<TypedEvent>) -> crate::stream::EventStream {
        crate::stream::EventStream::new(MapId::from("map-1"), events)
    }
}
