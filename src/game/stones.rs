//! Stone position snapshots.

use serde::{Deserialize, Serialize};

use super::Team;

/// Stones each team plays per end.
pub const STONES_PER_TEAM: usize = 8;

/// A point on the sheet, in meters. The origin marks "no stone" on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Across-sheet coordinate.
    pub x: f32,
    /// Along-sheet coordinate.
    pub y: f32,
}

impl Position {
    /// Creates a position from its coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether this is the origin, which the wire format reserves for
    /// "no stone in this slot".
    pub fn is_origin(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// A stone at rest on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stone {
    /// Where the stone sits.
    pub position: Position,
    /// Orientation of the stone, in radians.
    pub angle: f32,
}

impl Stone {
    /// Creates a stone at the given position with the given orientation.
    pub fn new(position: Position, angle: f32) -> Self {
        Self { position, angle }
    }
}

/// Snapshot of all sixteen stone slots, eight per team.
///
/// Empty slots are `None`; a slot is only populated once the stone is on the
/// sheet and still in play.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoneCoordinate {
    slots: [[Option<Stone>; STONES_PER_TEAM]; 2],
}

impl StoneCoordinate {
    /// An empty sheet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the stone in the given team slot, if any.
    pub fn stone(&self, team: Team, index: usize) -> Option<&Stone> {
        self.slots[team_slot(team)][index].as_ref()
    }

    /// Places (or clears) a stone in the given team slot.
    pub fn set(&mut self, team: Team, index: usize, stone: Option<Stone>) {
        self.slots[team_slot(team)][index] = stone;
    }

    /// Iterates a team's slots in order.
    pub fn team_stones(&self, team: Team) -> impl Iterator<Item = Option<&Stone>> {
        self.slots[team_slot(team)].iter().map(Option::as_ref)
    }

    /// Swaps slots 0 and 5 for both teams.
    ///
    /// Mixed doubles pre-places each team's first stone in slot 5 on the
    /// wire while the domain convention keeps it in slot 0.
    pub fn swap_lead_slots(&mut self) {
        for team in &mut self.slots {
            team.swap(0, 5);
        }
    }
}

fn team_slot(team: Team) -> usize {
    match team {
        Team::Team0 => 0,
        Team::Team1 => 1,
        Team::Unassigned => panic!("StoneCoordinate indexed with Team::Unassigned"),
    }
}
