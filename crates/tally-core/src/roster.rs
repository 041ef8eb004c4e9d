// Player roster: an insertion-ordered set of unique names.

use serde::{Deserialize, Serialize};

use crate::session::GameSession;

/// The set of players the leaderboard reports on.
///
/// Order is insertion order, which is also the tie order of the default
/// leaderboard sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    /// Build a roster from names, dropping duplicates after the first.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roster = Roster::new();
        for name in names {
            roster.add(name);
        }
        roster
    }

    /// Union of every entrant name across `sessions`, in first-seen order.
    pub fn from_sessions(sessions: &[GameSession]) -> Self {
        Roster::from_names(
            sessions
                .iter()
                .flat_map(|s| s.scores.iter().map(|e| e.name.clone())),
        )
    }

    /// Add a player. Returns `false` if the name was already present.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
