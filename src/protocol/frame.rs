//! Decoded stream-event payloads, exactly as the wire carries them.

use serde::Deserialize;

use crate::game::{Position, Team, TeamPair};

/// Payload of a `latest_state_update` / `state_update` event.
///
/// Several fields only appear on the first event of an end; reconstruction
/// (see [`reconstruct_state_update`](super::reconstruct_state_update)) fills
/// the gaps from session state.
#[derive(Debug, Clone, Deserialize)]
pub struct StateUpdateFrame {
    /// Shot counter within the end; absent on mixed-doubles end-setup events.
    #[serde(default)]
    pub total_shot_number: Option<i64>,
    /// Team throwing next; absent on end-setup events.
    #[serde(default)]
    pub next_shot_team: Option<Team>,
    /// Current end number, not yet clamped.
    pub end_number: u8,
    /// Remaining thinking time of team 0, in seconds.
    pub first_team_remaining_time: f64,
    /// Remaining thinking time of team 1, in seconds.
    pub second_team_remaining_time: f64,
    /// Per-team scores of the ends decided so far.
    pub score: TeamPair<Vec<u8>>,
    /// Parameters of the previous shot, when one was delivered.
    #[serde(default)]
    pub last_move: Option<LastMoveFrame>,
    /// Stone positions; meaningful mid-end and on resolved end-setup events.
    #[serde(default)]
    pub stone_coordinate: Option<StoneCoordinateFrame>,
    /// Winner, once the match is decided.
    #[serde(default)]
    pub winner_team: Option<Team>,
    /// Mixed-doubles extras, present on end-setup pseudo-events.
    #[serde(default)]
    pub mix_doubles_settings: Option<MixDoublesSettingsFrame>,
}

/// Wire form of the previous shot.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LastMoveFrame {
    /// Release speed in m/s.
    pub translational_velocity: f32,
    /// Release spin in rad/s, wire sign convention.
    pub angular_velocity: f32,
    /// Release angle in radians.
    pub shot_angle: f32,
}

/// Wire form of the stone-position snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct StoneCoordinateFrame {
    /// Fixed-size per-team position lists; the origin marks an empty slot.
    pub data: TeamPair<Vec<Position>>,
}

/// Mixed-doubles block of an end-setup pseudo-event.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MixDoublesSettingsFrame {
    /// Team entitled to choose the pre-placed stone position.
    pub end_setup_team: Team,
}
