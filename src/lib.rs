//! Canvas Pong - A two-paddle arcade game on a 2D canvas
//!
//! Core modules:
//! - `sim`: Physics core (anchoring, Verlet bodies, collisions) and match rules
//! - `main_loop`: Fixed timestep scheduler with panic recovery
//! - `game`: Wires the loop, match state, input and renderer together
//! - `renderer`: Canvas 2D drawing
//! - `platform`: Browser/native platform abstraction
//! - `history`: Finished match records
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod game;
pub mod history;
pub mod main_loop;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{PongError, Result};
pub use game::{GameConfig, PongGame};
pub use history::MatchHistory;
pub use main_loop::{FrameStats, LagPolicy, LoopHandle, MainLoop};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT: f32 = 1000.0 / 60.0;
    /// Updates per frame before the loop declares a panic
    pub const MAX_UPDATES_PER_FRAME: u32 = 240;

    /// Divides an input "force" down to a per-ms² acceleration
    pub const FORCE_DIVIDER: f32 = 10_000.0;

    /// Paddle defaults
    pub const PADDLE_OFFSET: f32 = 50.0;
    pub const PADDLE_WIDTH: f32 = 20.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    pub const PADDLE_MASS: f32 = 5.0;
    /// Pixels per step while a key is held
    pub const PADDLE_SPEED: f32 = 10.0;
    pub const PADDLE_ACCELERATION: f32 = 8.0;
    /// Pixels per ms
    pub const PADDLE_MAX_SPEED: f32 = 1.5;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 16.0;
    pub const BALL_MASS: f32 = 1.0;
    /// Pixels per step at serve
    pub const BALL_SPEED: f32 = 10.0;
    /// Serve angle range away from horizontal (radians)
    pub const SERVE_ANGLE_MIN: f32 = 0.26;
    pub const SERVE_ANGLE_MAX: f32 = 0.785;

    /// Energy kept on a bounce (1.0 = perfectly elastic)
    pub const RESTITUTION: f32 = 1.0;
    pub const WIN_SCORE: u32 = 5;
    /// Delay between a point and the next serve
    pub const RESPAWN_DELAY_MS: f32 = 1000.0;

    /// Scoreboard placement (top-center anchor)
    pub const SCOREBOARD_OFFSET_Y: f32 = 20.0;
    pub const SCOREBOARD_GAP: f32 = 50.0;
}
