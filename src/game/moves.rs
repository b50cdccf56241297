//! Actions a team can take on its turn.

use serde::{Deserialize, Serialize};

/// Parameters of a delivered stone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Speed of the stone along its release direction, in m/s.
    pub translational_velocity: f32,
    /// Spin applied at release, in rad/s. Positive is counter-clockwise in
    /// the domain convention; the wire format uses the opposite sign.
    pub angular_velocity: f32,
    /// Release direction relative to the center line, in radians.
    pub release_angle: f32,
}

impl Shot {
    /// Creates a shot from its three release parameters.
    pub fn new(translational_velocity: f32, angular_velocity: f32, release_angle: f32) -> Self {
        Self {
            translational_velocity,
            angular_velocity,
            release_angle,
        }
    }
}

/// A turn action returned by a thinking engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Move {
    /// Deliver a stone.
    Shot(Shot),
    /// Concede the match. Accepted but not transmitted: the protocol has no
    /// wire representation for concession.
    Concede,
}
