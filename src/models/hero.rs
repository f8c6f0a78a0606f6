//! Hero roles.

use serde::{Deserialize, Serialize};

/// The three competitive roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tank,
    Damage,
    Support,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Tank, Role::Damage, Role::Support];

    /// Role a hero belongs to, or `None` for names the table does not know.
    pub fn of_hero(hero: &str) -> Option<Self> {
        HERO_ROLES
            .iter()
            .find(|(name, _)| *name == hero)
            .map(|(_, role)| *role)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Tank => write!(f, "tank"),
            Role::Damage => write!(f, "damage"),
            Role::Support => write!(f, "support"),
        }
    }
}

/// Hero names as the exporter writes them. Accented names also appear
/// without accents in older logs.
static HERO_ROLES: &[(&str, Role)] = &[
    ("D.Va", Role::Tank),
    ("Doomfist", Role::Tank),
    ("Hazard", Role::Tank),
    ("Junker Queen", Role::Tank),
    ("Mauga", Role::Tank),
    ("Orisa", Role::Tank),
    ("Ramattra", Role::Tank),
    ("Reinhardt", Role::Tank),
    ("Roadhog", Role::Tank),
    ("Sigma", Role::Tank),
    ("Winston", Role::Tank),
    ("Wrecking Ball", Role::Tank),
    ("Zarya", Role::Tank),
    ("Ashe", Role::Damage),
    ("Bastion", Role::Damage),
    ("Cassidy", Role::Damage),
    ("Echo", Role::Damage),
    ("Freja", Role::Damage),
    ("Genji", Role::Damage),
    ("Hanzo", Role::Damage),
    ("Junkrat", Role::Damage),
    ("Mei", Role::Damage),
    ("Pharah", Role::Damage),
    ("Reaper", Role::Damage),
    ("Sojourn", Role::Damage),
    ("Soldier: 76", Role::Damage),
    ("Sombra", Role::Damage),
    ("Symmetra", Role::Damage),
    ("Torbjörn", Role::Damage),
    ("Torbjorn", Role::Damage),
    ("Tracer", Role::Damage),
    ("Venture", Role::Damage),
    ("Widowmaker", Role::Damage),
    ("Ana", Role::Support),
    ("Baptiste", Role::Support),
    ("Brigitte", Role::Support),
    ("Illari", Role::Support),
    ("Juno", Role::Support),
    ("Kiriko", Role::Support),
    ("Lifeweaver", Role::Support),
    ("Lúcio", Role::Support),
    ("Lucio", Role::Support),
    ("Mercy", Role::Support),
    ("Moira", Role::Support),
    ("Zenyatta", Role::Support),
];
