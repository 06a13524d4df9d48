//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)

pub mod anchor;
pub mod body;
pub mod collision;
pub mod state;
pub mod tick;

pub use anchor::{Anchor, Orientation, ReferenceFrame, Surface};
pub use body::{Body, CollisionPolicy, Color};
pub use collision::{Axis, BoundaryHit, CollisionResult};
pub use state::{
    Entity, EntityKind, GameEvent, GameMode, MatchPhase, MatchResult, MatchState, Player,
    PlayerResult, Scoreboard, Side,
};
pub use tick::{PaddleCommand, TickInput, autopilot, tick};
