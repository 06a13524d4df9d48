//! Fixed timestep match tick
//!
//! One call advances the match by one update step: follow the surface, steer
//! the paddles, integrate and collide everything, then settle the score.

use glam::Vec2;

use super::anchor::Surface;
use super::collision::BoundaryHit;
use super::state::{Entity, GameEvent, GameMode, MatchState, Side};
use crate::tuning::Tuning;

/// What one paddle was told to do this tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PaddleCommand {
    /// No input: paddle comes to rest
    #[default]
    Idle,
    /// Discrete intent, -1 up / +1 down
    Move(i8),
    /// Touch target: jump straight to this y
    Target(f32),
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Physical surface size reported by the host
    pub surface: Surface,
    pub left: PaddleCommand,
    pub right: PaddleCommand,
}

impl TickInput {
    pub fn command(&self, side: Side) -> PaddleCommand {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Advance the match by one fixed timestep of `dt` ms
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    if state.is_over() {
        return;
    }

    state.time_ms += dt as f64;
    state.time_ticks += 1;

    state.sync_surface(input.surface);
    state.fire_due_serves();

    // --- PADDLES ---
    let right = match state.mode {
        GameMode::SinglePlayer => autopilot(state, Side::Right),
        GameMode::TwoPlayers => input.right,
    };
    let commands = [input.left, right];

    let surface = state.surface;
    let tuning = state.tuning.clone();
    for (paddle, command) in state.paddles.iter_mut().zip(commands) {
        steer(paddle, command, &tuning);
        paddle.body.integrate(dt);
        paddle.body.resolve_boundary_collision(surface, tuning.restitution);
    }

    // --- BALLS ---
    let mut scored: Vec<(u32, Side)> = Vec::new();
    for ball in state.balls.iter_mut() {
        ball.body.integrate(dt);

        let hit = ball.body.resolve_boundary_collision(surface, tuning.restitution);
        match hit {
            BoundaryHit::Left => {
                scored.push((ball.id, Side::Right));
                continue;
            }
            BoundaryHit::Right => {
                scored.push((ball.id, Side::Left));
                continue;
            }
            BoundaryHit::Top | BoundaryHit::Bottom => {
                state.events.push(GameEvent::WallHit { edge: hit });
            }
            BoundaryHit::None => {}
        }

        for (paddle, side) in state.paddles.iter().zip(Side::BOTH) {
            let result = ball
                .body
                .resolve_body_collision(&paddle.body, tuning.restitution);
            if result.hit {
                state.events.push(GameEvent::PaddleHit { side });
            }
        }
    }

    if !scored.is_empty() {
        state
            .balls
            .retain(|ball| !scored.iter().any(|(id, _)| *id == ball.id));
        for (_, scorer) in scored {
            state.award_point(scorer);
        }
    }

    state.sync_scoreboard();
}

/// Apply one tick of input to a paddle
///
/// Acceleration accumulates for as long as a key is held and is only cleared
/// when the paddle goes idle (`stop`). The wall clamp keeps it, so reversing
/// straight out of a pinned run starts against the old acceleration.
fn steer(paddle: &mut Entity, command: PaddleCommand, tuning: &Tuning) {
    match command {
        PaddleCommand::Move(dir) if dir != 0 => {
            let dir = dir.signum() as f32;
            paddle
                .body
                .set_velocity(Vec2::new(0.0, dir * tuning.paddle_speed));
            paddle
                .body
                .apply_force(Vec2::new(0.0, dir * tuning.paddle_acceleration));
        }
        PaddleCommand::Target(y) if y.is_finite() => paddle.body.teleport_y(y),
        _ => paddle.body.stop(),
    }
}

/// Simple computer opponent: follow the closest ball heading our way,
/// otherwise drift back to the middle
pub fn autopilot(state: &MatchState, side: Side) -> PaddleCommand {
    let paddle = state.paddle(side).body.pos();
    let heading = match side {
        Side::Left => -1.0,
        Side::Right => 1.0,
    };

    let target_y = state
        .balls
        .iter()
        .filter(|ball| ball.body.velocity().x * heading > 0.0)
        .min_by(|a, b| {
            let da = (a.body.pos().x - paddle.x).abs();
            let db = (b.body.pos().x - paddle.x).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|ball| ball.body.pos().y)
        .unwrap_or(state.surface.height / 2.0);

    let dead_zone = state.tuning.paddle_height / 4.0;
    let diff = target_y - paddle.y;
    if diff.abs() <= dead_zone {
        PaddleCommand::Idle
    } else {
        PaddleCommand::Move(diff.signum() as i8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::{MatchPhase, Player};

    const SURFACE: Surface = Surface {
        width: 800.0,
        height: 600.0,
    };

    fn two_player_state(seed: u64) -> MatchState {
        MatchState::new(
            Tuning::default(),
            GameMode::TwoPlayers,
            Player::new("Ada"),
            Player::new("Bob"),
            SURFACE,
            seed,
        )
        .unwrap()
    }

    fn idle_input() -> TickInput {
        TickInput {
            surface: SURFACE,
            ..Default::default()
        }
    }

    fn launch(state: &mut MatchState, pos: Vec2, velocity: Vec2) {
        let ball = &mut state.balls[0].body;
        ball.anchor.pos = pos;
        ball.set_velocity(velocity);
    }

    #[test]
    fn test_keyboard_moves_paddle_down() {
        let mut state = two_player_state(1);
        let input = TickInput {
            left: PaddleCommand::Move(1),
            ..idle_input()
        };
        let start = state.paddle(Side::Left).body.pos().y;
        tick(&mut state, &input, SIM_DT);
        let moved = state.paddle(Side::Left).body.pos().y - start;
        assert!(moved > 0.0);
        // Speed cap: 1.5 px/ms
        assert!(moved <= state.tuning.paddle_max_speed.unwrap() * SIM_DT + 1e-3);
    }

    #[test]
    fn test_idle_paddle_stops() {
        let mut state = two_player_state(1);
        let mv = TickInput {
            right: PaddleCommand::Move(-1),
            ..idle_input()
        };
        tick(&mut state, &mv, SIM_DT);
        tick(&mut state, &idle_input(), SIM_DT);
        let paddle = &state.paddle(Side::Right).body;
        assert_eq!(paddle.velocity(), Vec2::ZERO);
        assert_eq!(paddle.acceleration, Vec2::ZERO);
    }

    #[test]
    fn test_touch_target_teleports() {
        let mut state = two_player_state(1);
        let input = TickInput {
            left: PaddleCommand::Target(120.0),
            ..idle_input()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.paddle(Side::Left).body.pos().y, 120.0);
    }

    #[test]
    fn test_paddle_stops_dead_at_edge() {
        let mut state = two_player_state(1);
        let input = TickInput {
            left: PaddleCommand::Move(-1),
            ..idle_input()
        };
        for _ in 0..200 {
            tick(&mut state, &input, SIM_DT);
        }
        let paddle = &state.paddle(Side::Left).body;
        assert_eq!(paddle.pos().y, state.tuning.paddle_height / 2.0);
    }

    #[test]
    fn test_held_acceleration_survives_wall_until_idle() {
        let mut state = two_player_state(1);
        let up = TickInput {
            left: PaddleCommand::Move(-1),
            ..idle_input()
        };
        for _ in 0..200 {
            tick(&mut state, &up, SIM_DT);
        }
        let paddle = &state.paddle(Side::Left).body;
        assert_eq!(paddle.pos().y, state.tuning.paddle_height / 2.0);
        assert!(paddle.acceleration.y < 0.0);

        tick(&mut state, &idle_input(), SIM_DT);
        assert_eq!(state.paddle(Side::Left).body.acceleration, Vec2::ZERO);
    }

    #[test]
    fn test_ball_bounces_off_right_paddle() {
        let mut state = two_player_state(2);
        launch(&mut state, Vec2::new(400.0, 300.0), Vec2::new(5.0, 0.0));

        let mut bounced = false;
        for _ in 0..200 {
            tick(&mut state, &idle_input(), SIM_DT);
            if state
                .drain_events()
                .contains(&GameEvent::PaddleHit { side: Side::Right })
            {
                bounced = true;
                break;
            }
        }
        assert!(bounced);

        let ball = &state.balls[0].body;
        let paddle = &state.paddle(Side::Right).body;
        assert!(ball.velocity().x < 0.0);
        // Flush against the paddle face, no overlap
        let gap = (paddle.pos().x - paddle.half_size().x) - (ball.pos().x + ball.half_size().x);
        assert!(gap.abs() < 1e-3, "gap {gap}");
    }

    #[test]
    fn test_wall_hit_event() {
        let mut state = two_player_state(2);
        launch(&mut state, Vec2::new(400.0, 12.0), Vec2::new(1.0, -6.0));
        tick(&mut state, &idle_input(), SIM_DT);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::WallHit { edge: BoundaryHit::Top })
        );
        assert!(state.balls[0].body.velocity().y > 0.0);
    }

    #[test]
    fn test_left_exit_scores_for_right_and_reserves() {
        let mut state = two_player_state(4);
        launch(&mut state, Vec2::new(10.0, 100.0), Vec2::new(-6.0, 0.0));
        state.drain_events();

        tick(&mut state, &idle_input(), SIM_DT);
        assert!(state.balls.is_empty());
        assert_eq!(state.player(Side::Right).score, 1);
        assert_eq!(state.scoreboard.score(Side::Right), 1);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::PointScored { scorer: Side::Right })
        );

        // A new ball arrives once the respawn delay has passed
        let ticks = (state.tuning.respawn_delay_ms / SIM_DT).ceil() as usize + 1;
        for _ in 0..ticks {
            tick(&mut state, &idle_input(), SIM_DT);
        }
        assert_eq!(state.balls.len(), 1);
    }

    #[test]
    fn test_match_ends_at_win_score() {
        let mut state = two_player_state(4);
        state.tuning.win_score = 2;

        for _ in 0..2 {
            if state.balls.is_empty() {
                state.serve_ball();
            }
            launch(&mut state, Vec2::new(10.0, 100.0), Vec2::new(-6.0, 0.0));
            tick(&mut state, &idle_input(), SIM_DT);
        }

        assert_eq!(state.phase, MatchPhase::GameOver);
        assert_eq!(state.player(Side::Right).score, 2);
        let ended: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::MatchEnded { .. }))
            .collect();
        assert_eq!(ended, vec![GameEvent::MatchEnded { winner: Side::Right }]);

        // Ticking a finished match is a no-op
        let ticks = state.time_ticks;
        tick(&mut state, &idle_input(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_autopilot_tracks_ball() {
        let mut state = MatchState::new(
            Tuning::default(),
            GameMode::SinglePlayer,
            Player::new("Ada"),
            Player::new("CPU"),
            SURFACE,
            8,
        )
        .unwrap();
        launch(&mut state, Vec2::new(400.0, 100.0), Vec2::new(4.0, 0.0));
        assert_eq!(autopilot(&state, Side::Right), PaddleCommand::Move(-1));

        // Ball heading away: return to the middle
        launch(&mut state, Vec2::new(400.0, 100.0), Vec2::new(-4.0, 0.0));
        assert_eq!(autopilot(&state, Side::Right), PaddleCommand::Idle);

        // Right-side input is ignored in single player
        let input = TickInput {
            right: PaddleCommand::Target(550.0),
            ..idle_input()
        };
        tick(&mut state, &input, SIM_DT);
        assert_ne!(state.paddle(Side::Right).body.pos().y, 550.0);
    }

    #[test]
    fn test_resize_mid_match() {
        let mut state = two_player_state(6);
        let input = TickInput {
            surface: Surface::new(1000.0, 600.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.paddle(Side::Right).body.pos().x, 950.0);
    }
}
