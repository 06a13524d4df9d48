//! Collision detection and response for axis-aligned rectangles
//!
//! Both responses work on Verlet bodies: moving a body out of penetration is
//! a write to `pos`, and changing how it bounces is a write to `prev`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anchor::Surface;
use super::body::Body;

/// Which surface edge a body struck this step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryHit {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
}

impl BoundaryHit {
    /// Left and right edges end a ball's life
    pub fn is_scoring(&self) -> bool {
        matches!(self, BoundaryHit::Left | BoundaryHit::Right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Result of a body-vs-body check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Axis the overlap was resolved on
    pub axis: Axis,
    /// Overlap removed from the moving body
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            axis: Axis::X,
            penetration: 0.0,
        }
    }
}

/// Signed distance the body sticks out past [0, extent] on one axis.
/// Negative means past the near edge, positive past the far edge.
fn edge_overlap(center: f32, half: f32, extent: f32) -> f32 {
    let near = center - half;
    let far = center + half - extent;
    if near < 0.0 {
        near
    } else if far > 0.0 {
        far
    } else {
        0.0
    }
}

/// Clamp a body back inside the surface, killing velocity on each clamped axis
pub fn dead_stop_boundary(body: &mut Body, surface: Surface) -> BoundaryHit {
    let half = body.half_size();
    let pos = body.pos();
    let overlap = Vec2::new(
        edge_overlap(pos.x, half.x, surface.width),
        edge_overlap(pos.y, half.y, surface.height),
    );

    let mut hit = BoundaryHit::None;
    if overlap.y != 0.0 {
        body.anchor.pos.y -= overlap.y;
        body.prev.y = body.anchor.pos.y;
        hit = if overlap.y < 0.0 { BoundaryHit::Top } else { BoundaryHit::Bottom };
    }
    if overlap.x != 0.0 {
        body.anchor.pos.x -= overlap.x;
        body.prev.x = body.anchor.pos.x;
        hit = if overlap.x < 0.0 { BoundaryHit::Left } else { BoundaryHit::Right };
    }
    hit
}

/// Bounce a body off the surface edges.
///
/// Each axis is handled independently: the body is moved back onto the edge
/// and its velocity on that axis is reversed and scaled by `restitution`.
/// When a corner is struck the horizontal edge is reported.
pub fn reflect_boundary(body: &mut Body, surface: Surface, restitution: f32) -> BoundaryHit {
    let half = body.half_size();
    let pos = body.pos();
    let velocity = body.velocity();
    let overlap = Vec2::new(
        edge_overlap(pos.x, half.x, surface.width),
        edge_overlap(pos.y, half.y, surface.height),
    );

    let mut hit = BoundaryHit::None;
    if overlap.y != 0.0 {
        body.anchor.pos.y -= overlap.y;
        body.prev.y = body.anchor.pos.y + restitution * velocity.y;
        hit = if overlap.y < 0.0 { BoundaryHit::Top } else { BoundaryHit::Bottom };
    }
    if overlap.x != 0.0 {
        body.anchor.pos.x -= overlap.x;
        body.prev.x = body.anchor.pos.x + restitution * velocity.x;
        hit = if overlap.x < 0.0 { BoundaryHit::Left } else { BoundaryHit::Right };
    }
    hit
}

/// Separate `body` from `other` along the axis of least overlap.
///
/// On that axis the body is pushed clear, its velocity reflected and scaled by
/// `restitution`; then a share `m_other / (m_body + m_other)` of the other
/// body's current velocity is added on both axes. `other` is left untouched.
pub fn reflect_off_body(body: &mut Body, other: &Body, restitution: f32) -> CollisionResult {
    let distance = body.pos() - other.pos();
    let reach = body.half_size() + other.half_size();
    let overlap = reach - distance.abs();

    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return CollisionResult::miss();
    }

    let velocity = body.velocity();
    let axis = if overlap.x < overlap.y { Axis::X } else { Axis::Y };
    let penetration = match axis {
        Axis::X => {
            body.anchor.pos.x += distance.x.signum() * overlap.x;
            body.prev.x = body.anchor.pos.x + restitution * velocity.x;
            overlap.x
        }
        Axis::Y => {
            body.anchor.pos.y += distance.y.signum() * overlap.y;
            body.prev.y = body.anchor.pos.y + restitution * velocity.y;
            overlap.y
        }
    };

    let total_mass = body.mass() + other.mass();
    if total_mass > 0.0 {
        let share = other.mass() / total_mass;
        body.add_velocity(other.velocity() * share);
    }

    CollisionResult {
        hit: true,
        axis,
        penetration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::anchor::{Anchor, ReferenceFrame};
    use crate::sim::body::CollisionPolicy;

    const SURFACE: Surface = Surface {
        width: 800.0,
        height: 600.0,
    };

    fn body(x: f32, y: f32, size: f32, mass: f32, policy: CollisionPolicy) -> Body {
        let anchor = Anchor::new(Vec2::new(x, y), ReferenceFrame::TopLeft, SURFACE);
        Body::new(anchor, Vec2::splat(size), mass, policy).unwrap()
    }

    fn overlaps(a: &Body, b: &Body) -> bool {
        let overlap = a.half_size() + b.half_size() - (a.pos() - b.pos()).abs();
        overlap.x > 0.0 && overlap.y > 0.0
    }

    #[test]
    fn test_reflect_right_wall() {
        // Ball moving right at 6 px/step, 4 px past the right edge
        let mut ball = body(796.0, 300.0, 16.0, 1.0, CollisionPolicy::Reflective);
        ball.set_velocity(Vec2::new(6.0, 0.0));

        let hit = ball.resolve_boundary_collision(SURFACE, 1.0);
        assert_eq!(hit, BoundaryHit::Right);
        assert_eq!(ball.pos().x, 792.0);
        assert_eq!(ball.velocity(), Vec2::new(-6.0, 0.0));
        assert_eq!(edge_overlap(ball.pos().x, 8.0, SURFACE.width), 0.0);
    }

    #[test]
    fn test_reflect_top_preserves_horizontal_velocity() {
        let mut ball = body(400.0, 5.0, 16.0, 1.0, CollisionPolicy::Reflective);
        ball.set_velocity(Vec2::new(3.0, -4.0));

        let hit = ball.resolve_boundary_collision(SURFACE, 1.0);
        assert_eq!(hit, BoundaryHit::Top);
        assert!(!hit.is_scoring());
        assert_eq!(ball.pos().y, 8.0);
        assert_eq!(ball.velocity(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_reflect_left_is_scoring() {
        let mut ball = body(2.0, 300.0, 16.0, 1.0, CollisionPolicy::Reflective);
        ball.set_velocity(Vec2::new(-5.0, 2.0));

        let hit = ball.resolve_boundary_collision(SURFACE, 1.0);
        assert_eq!(hit, BoundaryHit::Left);
        assert!(hit.is_scoring());
        assert_eq!(ball.velocity().y, 2.0);
    }

    #[test]
    fn test_restitution_scales_bounce() {
        let mut ball = body(400.0, 596.0, 16.0, 1.0, CollisionPolicy::Reflective);
        ball.set_velocity(Vec2::new(0.0, 10.0));
        let hit = ball.resolve_boundary_collision(SURFACE, 0.5);
        assert_eq!(hit, BoundaryHit::Bottom);
        assert!((ball.velocity().y + 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_corner_reports_horizontal_edge() {
        let mut ball = body(798.0, 598.0, 16.0, 1.0, CollisionPolicy::Reflective);
        ball.set_velocity(Vec2::new(4.0, 4.0));
        assert_eq!(ball.resolve_boundary_collision(SURFACE, 1.0), BoundaryHit::Right);
        assert_eq!(ball.velocity(), Vec2::new(-4.0, -4.0));
    }

    #[test]
    fn test_inside_is_none() {
        let mut ball = body(400.0, 300.0, 16.0, 1.0, CollisionPolicy::Reflective);
        ball.set_velocity(Vec2::new(4.0, 4.0));
        assert_eq!(ball.resolve_boundary_collision(SURFACE, 1.0), BoundaryHit::None);
        assert_eq!(ball.velocity(), Vec2::new(4.0, 4.0));
    }

    #[test]
    fn test_dead_stop_clamps_and_kills_axis_velocity() {
        let mut paddle = body(400.0, 40.0, 100.0, 5.0, CollisionPolicy::DeadStop);
        paddle.set_velocity(Vec2::new(2.0, -10.0));

        let hit = paddle.resolve_boundary_collision(SURFACE, 1.0);
        assert_eq!(hit, BoundaryHit::Top);
        assert_eq!(paddle.pos().y, 50.0);
        assert_eq!(paddle.velocity(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_equal_mass_transfers_half_velocity() {
        // Ball moving right into a body moving left, overlapping on x
        let mut ball = body(100.0, 100.0, 20.0, 1.0, CollisionPolicy::Reflective);
        ball.set_velocity(Vec2::new(5.0, 0.0));
        let mut other = body(118.0, 100.0, 20.0, 1.0, CollisionPolicy::Reflective);
        other.set_velocity(Vec2::new(-3.0, 1.0));

        let result = ball.resolve_body_collision(&other, 1.0);
        assert!(result.hit);
        assert_eq!(result.axis, Axis::X);
        assert!((result.penetration - 2.0).abs() < 1e-4);
        // Pushed left by the overlap
        assert!((ball.pos().x - 98.0).abs() < 1e-4);
        // -5 reflected, plus half of (-3, 1)
        let v = ball.velocity();
        assert!((v.x + 6.5).abs() < 1e-4);
        assert!((v.y - 0.5).abs() < 1e-4);
        // Other body untouched
        assert_eq!(other.velocity(), Vec2::new(-3.0, 1.0));
    }

    #[test]
    fn test_resolves_on_smaller_overlap_axis() {
        // Ball dropping onto the top of a wide paddle
        let mut ball = body(400.0, 290.0, 16.0, 1.0, CollisionPolicy::Reflective);
        ball.set_velocity(Vec2::new(1.0, 6.0));
        let mut paddle = body(400.0, 305.0, 20.0, 5.0, CollisionPolicy::DeadStop);
        paddle.size = Vec2::new(200.0, 20.0);

        let result = ball.resolve_body_collision(&paddle, 1.0);
        assert!(result.hit);
        assert_eq!(result.axis, Axis::Y);
        assert!((ball.pos().y - 287.0).abs() < 1e-4);
        assert!((ball.velocity() - Vec2::new(1.0, -6.0)).length() < 1e-4);
        assert!(!overlaps(&ball, &paddle));
    }

    #[test]
    fn test_heavy_body_dominates_transfer() {
        let mut ball = body(100.0, 100.0, 20.0, 1.0, CollisionPolicy::Reflective);
        ball.set_velocity(Vec2::new(4.0, 0.0));
        let mut paddle = body(119.0, 100.0, 20.0, 5.0, CollisionPolicy::DeadStop);
        paddle.set_velocity(Vec2::new(0.0, 6.0));

        ball.resolve_body_collision(&paddle, 1.0);
        let v = ball.velocity();
        assert!((v.x + 4.0).abs() < 1e-4);
        assert!((v.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_separated_bodies_miss() {
        let mut ball = body(100.0, 100.0, 20.0, 1.0, CollisionPolicy::Reflective);
        ball.set_velocity(Vec2::new(4.0, 0.0));
        let other = body(120.0, 100.0, 20.0, 1.0, CollisionPolicy::DeadStop);
        assert!(!ball.resolve_body_collision(&other, 1.0).hit);
        assert_eq!(ball.velocity(), Vec2::new(4.0, 0.0));
    }
}
