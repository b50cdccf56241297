//! Wire models and wire-to-domain reconstruction.

mod descriptor;
mod frame;
mod reconstruct;
pub(crate) mod sse;

pub use descriptor::{FreeGuardZoneRule, GameRule, GameRuleType, GameSetting, MatchInfo};
pub use frame::{LastMoveFrame, MixDoublesSettingsFrame, StateUpdateFrame, StoneCoordinateFrame};
pub use reconstruct::{StateUpdateEventData, reconstruct_state_update};
