//! Team identity and per-team value pairs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the two competing teams, or no team at all.
///
/// `Unassigned` doubles as "no team yet" on a fresh session and as the
/// next-shot team of a mixed-doubles end-setup pseudo-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// First team.
    #[serde(rename = "team0")]
    Team0,
    /// Second team.
    #[serde(rename = "team1")]
    Team1,
    /// No team.
    #[serde(rename = "unassigned")]
    Unassigned,
}

impl Team {
    /// Returns the opposing team; `Unassigned` has no opponent.
    pub fn opponent(self) -> Team {
        match self {
            Team::Team0 => Team::Team1,
            Team::Team1 => Team::Team0,
            Team::Unassigned => Team::Unassigned,
        }
    }

    /// Whether this is an actual team rather than `Unassigned`.
    pub fn is_assigned(self) -> bool {
        self != Team::Unassigned
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Team::Team0 => "team0",
            Team::Team1 => "team1",
            Team::Unassigned => "unassigned",
        };
        write!(f, "{name}")
    }
}

/// A value held once per team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPair<T> {
    /// Value for [`Team::Team0`].
    pub team0: T,
    /// Value for [`Team::Team1`].
    pub team1: T,
}

impl<T> TeamPair<T> {
    /// Creates a pair from both teams' values.
    pub fn new(team0: T, team1: T) -> Self {
        Self { team0, team1 }
    }
}

impl<T> Index<Team> for TeamPair<T> {
    type Output = T;

    fn index(&self, team: Team) -> &T {
        match team {
            Team::Team0 => &self.team0,
            Team::Team1 => &self.team1,
            Team::Unassigned => panic!("TeamPair indexed with Team::Unassigned"),
        }
    }
}

impl<T> IndexMut<Team> for TeamPair<T> {
    fn index_mut(&mut self, team: Team) -> &mut T {
        match team {
            Team::Team0 => &mut self.team0,
            Team::Team1 => &mut self.team1,
            Team::Unassigned => panic!("TeamPair indexed with Team::Unassigned"),
        }
    }
}
