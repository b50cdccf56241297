//! Hogline, a digital curling match client.
//!
//! Connects to a competitive curling-match server, reconstructs
//! authoritative local game state from the incremental event stream, and
//! drives a pluggable thinking engine that decides each shot.
//!
//! # Architecture
//!
//! - **Protocol**: wire models for the match descriptor and stream events,
//!   plus the pure wire-to-domain reconstruction
//! - **Client**: the join/connect lifecycle, the producer/consumer event
//!   loop, and the rule-variant turn dispatch
//! - **Engine**: the contracts a decision engine and its simulator/player
//!   factories implement
//! - **Game**: the curling domain model the client reconstructs
//!
//! # Example
//!
//! ```no_run
//! use hogline::{
//!     ClientFactory, ConnectSettings, DrawEngine, NormalDistFactoryCreator, Team,
//! };
//!
//! # async fn example() -> Result<(), hogline::ClientError> {
//! let engine = Box::new(DrawEngine::new());
//! let factories = Box::new(NormalDistFactoryCreator);
//!
//! let mut client =
//!     ClientFactory::create_client("curling.example", "match-1", engine, factories).await?;
//! client.join(Team::Team0, "user", "password").await?;
//! client.connect(ConnectSettings::default()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod client;
mod engine;
mod engines;
mod error;
mod game;
mod protocol;

// Crate-level exports - Client lifecycle
pub use client::{ClientFactory, ConnectCallbacks, ConnectSettings, GameClient};

// Crate-level exports - Engine contracts
pub use engine::{
    FactoryCreator, Gender, Player, PlayerFactory, PositionedStone, Simulator, SimulatorFactory,
    ThinkingEngine,
};

// Crate-level exports - Illustrative implementations
pub use engines::{DrawEngine, NormalDistFactoryCreator, NormalDistPlayerFactory};

// Crate-level exports - Errors
pub use error::ClientError;

// Crate-level exports - Domain model
pub use game::{
    GameResult, GameResultReason, GameState, Move, Position, STONES_PER_TEAM, Shot, Stone,
    StoneCoordinate, Team, TeamPair,
};

// Crate-level exports - Wire models and reconstruction
pub use protocol::{
    FreeGuardZoneRule, GameRule, GameRuleType, GameSetting, LastMoveFrame, MatchInfo,
    MixDoublesSettingsFrame, StateUpdateEventData, StateUpdateFrame, StoneCoordinateFrame,
    reconstruct_state_update,
};
