//! Team fight model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CombatEvent;

/// A time-clustered group of kills treated as one engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fight {
    /// Match time of the first kill
    pub start: f64,

    /// Match time of the last kill
    pub end: f64,

    /// Member kills in log order
    pub kills: Vec<CombatEvent>,
}

impl Fight {
    /// Start a fight with its opening kill.
    pub fn open(first: CombatEvent) -> Self {
        Self {
            start: first.match_time,
            end: first.match_time,
            kills: vec![first],
        }
    }

    pub fn push(&mut self, kill: CombatEvent) {
        self.end = kill.match_time;
        self.kills.push(kill);
    }

    pub fn len(&self) -> usize {
        self.kills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kills.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn first_kill(&self) -> Option<&CombatEvent> {
        self.kills.first()
    }

    /// Kill count per attacking team.
    pub fn kills_by_team(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for kill in &self.kills {
            *counts.entry(kill.attacker_team.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Team with strictly more than half of the fight's kills.
    ///
    /// An evenly split fight has no winner.
    pub fn winner(&self) -> Option<&str> {
        let total = self.kills.len();
        self.kills_by_team()
            .into_iter()
            .find(|(_, count)| count * 2 > total)
            .map(|(team, _)| team)
    }

    pub fn kills_by_player(&self, player: &str) -> usize {
        self.kills
            .iter()
            .filter(|k| k.attacker_name == player)
            .count()
    }

    /// Kills in this fight scored by anyone not on `team`.
    pub fn kills_against(&self, team: &str) -> usize {
        self.kills.iter().filter(|k| k.attacker_team != team).count()
    }
}
