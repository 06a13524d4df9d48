//! Data-driven game balance
//!
//! Every number the physics and match rules read. Defaults come from
//! [`crate::consts`]; a tuning loaded from settings is validated before a
//! match is built from it.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{PongError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Paddles ===
    /// Distance from the side edge to the paddle center
    pub paddle_offset: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_mass: f32,
    /// Pixels per step while moving
    pub paddle_speed: f32,
    /// Force added every step a key is held (divided by `FORCE_DIVIDER`)
    pub paddle_acceleration: f32,
    /// Pixels per ms
    pub paddle_max_speed: Option<f32>,

    // === Ball ===
    pub ball_size: f32,
    pub ball_mass: f32,
    /// Pixels per step at serve
    pub ball_speed: f32,
    pub ball_max_speed: Option<f32>,
    /// Serve angle range (radians off horizontal)
    pub serve_angle_min: f32,
    pub serve_angle_max: f32,

    // === Rules ===
    pub restitution: f32,
    pub win_score: u32,
    pub respawn_delay_ms: f32,

    // === Loop ===
    /// Simulation timestep in ms
    pub timestep_ms: f32,
    /// Updates in one frame before the loop panics
    pub max_updates_per_frame: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_offset: PADDLE_OFFSET,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_mass: PADDLE_MASS,
            paddle_speed: PADDLE_SPEED,
            paddle_acceleration: PADDLE_ACCELERATION,
            paddle_max_speed: Some(PADDLE_MAX_SPEED),

            ball_size: BALL_SIZE,
            ball_mass: BALL_MASS,
            ball_speed: BALL_SPEED,
            ball_max_speed: None,
            serve_angle_min: SERVE_ANGLE_MIN,
            serve_angle_max: SERVE_ANGLE_MAX,

            restitution: RESTITUTION,
            win_score: WIN_SCORE,
            respawn_delay_ms: RESPAWN_DELAY_MS,

            timestep_ms: SIM_DT,
            max_updates_per_frame: MAX_UPDATES_PER_FRAME,
        }
    }
}

fn positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PongError::InvalidConfig(format!("{name} must be positive, got {value}")))
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<()> {
        positive("paddle_width", self.paddle_width)?;
        positive("paddle_height", self.paddle_height)?;
        positive("paddle_mass", self.paddle_mass)?;
        positive("ball_size", self.ball_size)?;
        positive("ball_mass", self.ball_mass)?;
        positive("ball_speed", self.ball_speed)?;
        positive("timestep_ms", self.timestep_ms)?;
        for (name, cap) in [
            ("paddle_max_speed", self.paddle_max_speed),
            ("ball_max_speed", self.ball_max_speed),
        ] {
            if let Some(cap) = cap {
                positive(name, cap)?;
            }
        }

        if !(self.paddle_offset.is_finite() && self.paddle_speed.is_finite()) {
            return Err(PongError::InvalidConfig("paddle offset/speed must be finite".into()));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(PongError::InvalidConfig(format!(
                "restitution must be within [0, 1], got {}",
                self.restitution
            )));
        }
        if !(0.0 <= self.serve_angle_min
            && self.serve_angle_min <= self.serve_angle_max
            && self.serve_angle_max < std::f32::consts::FRAC_PI_2)
        {
            return Err(PongError::InvalidConfig(format!(
                "serve angles must satisfy 0 <= min <= max < pi/2, got {}..{}",
                self.serve_angle_min, self.serve_angle_max
            )));
        }
        if self.win_score == 0 {
            return Err(PongError::InvalidConfig("win_score must be at least 1".into()));
        }
        if self.max_updates_per_frame == 0 {
            return Err(PongError::InvalidConfig(
                "max_updates_per_frame must be at least 1".into(),
            ));
        }
        if !(self.respawn_delay_ms.is_finite() && self.respawn_delay_ms >= 0.0) {
            return Err(PongError::InvalidConfig(
                "respawn_delay_ms must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
