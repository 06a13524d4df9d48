//! Rectangular bodies with Verlet integration
//!
//! A body never stores its velocity. It keeps the position it had one step
//! ago and velocity is whatever separates the two, so collision response
//! only has to rewrite `prev` to change how the body moves next.

use glam::Vec2;

use super::anchor::{Anchor, ReferenceFrame, Surface};
use super::collision::{self, BoundaryHit, CollisionResult};
use crate::consts::FORCE_DIVIDER;
use crate::error::{PongError, Result};

/// How a body answers when it touches the surface edge or another body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Clamp inside the surface and lose all velocity on that axis.
    /// Ignores other bodies.
    #[default]
    DeadStop,
    /// Bounce off edges and bodies, borrowing momentum from what it hits
    Reflective,
}

/// 0xRRGGBB fill color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFFFF);

    pub fn to_css(&self) -> String {
        format!("#{:06x}", self.0 & 0xFFFFFF)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub anchor: Anchor,
    /// Position one integration step ago
    pub prev: Vec2,
    pub size: Vec2,
    mass: f32,
    pub acceleration: Vec2,
    /// Pixels per millisecond
    pub max_speed: Option<f32>,
    pub color: Color,
    pub policy: CollisionPolicy,
}

impl Body {
    /// Create a body at rest. Mass must be positive and finite.
    pub fn new(anchor: Anchor, size: Vec2, mass: f32, policy: CollisionPolicy) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PongError::InvalidArgument(format!(
                "body mass must be positive, got {mass}"
            )));
        }
        Ok(Self {
            anchor,
            prev: anchor.pos,
            size,
            mass,
            acceleration: Vec2::ZERO,
            max_speed: None,
            color: Color::default(),
            policy,
        })
    }

    pub fn with_max_speed(mut self, max_speed: Option<f32>) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.anchor.pos
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size / 2.0
    }

    pub fn frame(&self) -> ReferenceFrame {
        self.anchor.frame()
    }

    /// Move to the absolute position `offset` resolves to, at rest
    pub fn place(&mut self, offset: Vec2, frame: ReferenceFrame, surface: Surface) {
        self.anchor.place(offset, frame, surface);
        self.prev = self.anchor.pos;
    }

    /// Follow the anchor after a resize. Velocity is unchanged.
    pub fn rebase(&mut self, delta: Vec2) {
        let shift = self.anchor.rebase(delta);
        self.prev += shift;
    }

    /// Advance one step of `dt` milliseconds
    pub fn integrate(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }

        let displacement = self.velocity() + self.acceleration * dt * dt;
        self.prev = self.anchor.pos;

        if let Some(max_speed) = self.max_speed {
            let distance = displacement.length();
            if distance > 0.0 && distance / dt > max_speed {
                let scale = max_speed * dt / distance;
                self.anchor.pos += displacement * scale;
                return;
            }
        }

        self.anchor.pos += displacement;
    }

    /// Implicit velocity, in pixels per step
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.anchor.pos - self.prev
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.prev = self.anchor.pos - velocity;
    }

    pub fn add_velocity(&mut self, velocity: Vec2) {
        self.prev -= velocity;
    }

    /// Acceleration becomes `force / divider`
    pub fn set_acceleration(&mut self, force: Vec2, divider: f32) {
        if divider != 0.0 {
            self.acceleration = force / divider;
        }
    }

    /// Acceleration grows by `force / divider`
    pub fn add_acceleration(&mut self, force: Vec2, divider: f32) {
        if divider != 0.0 {
            self.acceleration += force / divider;
        }
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.add_acceleration(force, FORCE_DIVIDER);
    }

    /// Zero velocity and acceleration
    pub fn stop(&mut self) {
        self.prev = self.anchor.pos;
        self.acceleration = Vec2::ZERO;
    }

    /// Jump to `y` without integrating that axis this step
    pub fn teleport_y(&mut self, y: f32) {
        self.anchor.pos.y = y;
        self.prev.y = y;
        self.acceleration.y = 0.0;
    }

    /// Keep the body on the surface according to its policy
    pub fn resolve_boundary_collision(&mut self, surface: Surface, restitution: f32) -> BoundaryHit {
        match self.policy {
            CollisionPolicy::DeadStop => collision::dead_stop_boundary(self, surface),
            CollisionPolicy::Reflective => collision::reflect_boundary(self, surface, restitution),
        }
    }

    /// Push this body out of `other`. Only reflective bodies respond; `other`
    /// is treated as immovable.
    pub fn resolve_body_collision(&mut self, other: &Body, restitution: f32) -> CollisionResult {
        match self.policy {
            CollisionPolicy::DeadStop => CollisionResult::miss(),
            CollisionPolicy::Reflective => collision::reflect_off_body(self, other, restitution),
        }
    }
}
