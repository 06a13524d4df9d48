//! Match state and core simulation types
//!
//! Everything the update phase mutates lives here. The draw phase only reads.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::anchor::{Anchor, Orientation, ReferenceFrame, Surface};
use super::body::{Body, CollisionPolicy};
use super::collision::BoundaryHit;
use crate::consts::{SCOREBOARD_GAP, SCOREBOARD_OFFSET_Y};
use crate::error::{PongError, Result};
use crate::tuning::Tuning;

/// Left or right half of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl FromStr for Side {
    type Err = PongError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(PongError::InvalidArgument(format!(
                "invalid side {other:?}, use 'left' or 'right'"
            ))),
        }
    }
}

/// Who controls the right paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Right paddle is driven by the autopilot
    #[default]
    #[serde(rename = "Single Player")]
    SinglePlayer,
    #[serde(rename = "Two Players")]
    TwoPlayers,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::SinglePlayer => "Single Player",
            GameMode::TwoPlayers => "Two Players",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = PongError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Single Player" => Ok(GameMode::SinglePlayer),
            "Two Players" => Ok(GameMode::TwoPlayers),
            other => Err(PongError::InvalidArgument(format!(
                "game mode must be 'Single Player' or 'Two Players', got {other:?}"
            ))),
        }
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Playing,
    /// A player reached the win score
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Paddle(Side),
    Ball,
}

/// A body on the table
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub body: Body,
}

/// Things the host may want to react to (sound, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A ball bounced off a paddle
    PaddleHit { side: Side },
    /// A ball bounced off the top or bottom edge
    WallHit { edge: BoundaryHit },
    /// A ball left through a scoring edge
    PointScored { scorer: Side },
    /// A new ball entered play
    BallServed { toward: Side },
    MatchEnded { winner: Side },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub score: u32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            score: 0,
        }
    }

    pub fn increment_score(&mut self) {
        self.score = self.score.saturating_add(1);
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }
}

/// Displayed scores, anchored to the top-center of the table
#[derive(Debug, Clone)]
pub struct Scoreboard {
    pub anchor: Anchor,
    pub gap: f32,
    left: u32,
    right: u32,
}

impl Scoreboard {
    pub fn new(surface: Surface) -> Self {
        Self {
            anchor: Anchor::new(
                Vec2::new(0.0, SCOREBOARD_OFFSET_Y),
                ReferenceFrame::TopCenter,
                surface,
            ),
            gap: SCOREBOARD_GAP,
            left: 0,
            right: 0,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Set one side's score, or add one when `new_score` is `None`
    pub fn update_side_score(&mut self, side: Side, new_score: Option<u32>) {
        let slot = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *slot = match new_score {
            Some(score) => score,
            None => slot.saturating_add(1),
        };
    }

    /// Same as [`update_side_score`](Self::update_side_score) with the side by name
    pub fn update_side_score_named(&mut self, side: &str, new_score: Option<u32>) -> Result<()> {
        let side: Side = side.parse()?;
        self.update_side_score(side, new_score);
        Ok(())
    }

    /// Overwrite whichever sides are given
    pub fn update_score(&mut self, left: Option<u32>, right: Option<u32>) {
        if let Some(left) = left {
            self.left = left;
        }
        if let Some(right) = right {
            self.right = right;
        }
    }

    /// Two-digit zero-padded labels
    pub fn labels(&self) -> (String, String) {
        (format!("{:02}", self.left), format!("{:02}", self.right))
    }
}

/// One side's line in a finished match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub name: String,
    pub score: u32,
}

/// What gets handed to the history store when a match ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub player1: PlayerResult,
    pub player2: PlayerResult,
    pub mode: GameMode,
}

impl MatchResult {
    pub fn winner(&self) -> Option<Side> {
        match self.player1.score.cmp(&self.player2.score) {
            std::cmp::Ordering::Greater => Some(Side::Left),
            std::cmp::Ordering::Less => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A serve waiting on the simulation clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingServe {
    pub due_ms: f64,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct MatchState {
    pub tuning: Tuning,
    pub mode: GameMode,
    pub phase: MatchPhase,
    /// Logical table size (width/height swapped in portrait)
    pub surface: Surface,
    pub orientation: Orientation,
    pub players: [Player; 2],
    pub scoreboard: Scoreboard,
    /// Left then right
    pub paddles: [Entity; 2],
    /// Active balls (sorted by id)
    pub balls: Vec<Entity>,
    pub pending_serves: Vec<PendingServe>,
    /// Simulation clock
    pub time_ms: f64,
    pub time_ticks: u64,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
    rng: Pcg32,
    ball_template: Body,
    next_id: u32,
}

impl MatchState {
    /// Set up a fresh match on a physical surface and serve the first ball
    pub fn new(
        tuning: Tuning,
        mode: GameMode,
        player1: Player,
        player2: Player,
        physical: Surface,
        seed: u64,
    ) -> Result<Self> {
        tuning.validate()?;

        let orientation = Orientation::of(physical);
        let surface = orientation.logical(physical);

        let paddle_size = Vec2::new(tuning.paddle_width, tuning.paddle_height);
        let paddle_offset = Vec2::new(tuning.paddle_offset, 0.0);
        let paddle = |frame| -> Result<Body> {
            Ok(Body::new(
                Anchor::new(paddle_offset, frame, surface),
                paddle_size,
                tuning.paddle_mass,
                CollisionPolicy::DeadStop,
            )?
            .with_max_speed(tuning.paddle_max_speed))
        };
        let left = paddle(ReferenceFrame::CenterLeft)?;
        let right = paddle(ReferenceFrame::CenterRight)?;

        let ball_template = Body::new(
            Anchor::new(Vec2::ZERO, ReferenceFrame::Center, surface),
            Vec2::splat(tuning.ball_size),
            tuning.ball_mass,
            CollisionPolicy::Reflective,
        )?
        .with_max_speed(tuning.ball_max_speed);

        let mut state = Self {
            tuning,
            mode,
            phase: MatchPhase::Playing,
            surface,
            orientation,
            players: [player1, player2],
            scoreboard: Scoreboard::new(surface),
            paddles: [
                Entity {
                    id: 1,
                    kind: EntityKind::Paddle(Side::Left),
                    body: left,
                },
                Entity {
                    id: 2,
                    kind: EntityKind::Paddle(Side::Right),
                    body: right,
                },
            ],
            balls: Vec::new(),
            pending_serves: Vec::new(),
            time_ms: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            ball_template,
            next_id: 3,
        };

        log::info!(
            "Match started: {} vs {} ({}), first to {}",
            state.players[0].name,
            state.players[1].name,
            state.mode,
            state.tuning.win_score
        );
        state.serve_ball();
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn paddle(&self, side: Side) -> &Entity {
        &self.paddles[side.index()]
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Entity {
        &mut self.paddles[side.index()]
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::GameOver
    }

    /// Put a new ball at the table center heading toward a random player,
    /// at an angle kept away from straight horizontal
    pub fn serve_ball(&mut self) -> Side {
        let toward = if self.rng.random_bool(0.5) {
            Side::Right
        } else {
            Side::Left
        };
        let angle = self
            .rng
            .random_range(self.tuning.serve_angle_min..=self.tuning.serve_angle_max);
        let angle = if self.rng.random_bool(0.5) { angle } else { -angle };
        let heading = match toward {
            Side::Right => 1.0,
            Side::Left => -1.0,
        };
        let direction = Vec2::new(heading * angle.cos(), angle.sin()).normalize_or_zero();

        let mut body = self.ball_template.clone();
        body.place(Vec2::ZERO, ReferenceFrame::Center, self.surface);
        body.set_velocity(direction * self.tuning.ball_speed);

        let id = self.next_entity_id();
        self.balls.push(Entity {
            id,
            kind: EntityKind::Ball,
            body,
        });
        self.events.push(GameEvent::BallServed { toward });
        log::debug!("Ball {} served toward {}", id, toward.as_str());
        toward
    }

    /// Queue a serve after the configured delay
    pub fn schedule_serve(&mut self) {
        self.pending_serves.push(PendingServe {
            due_ms: self.time_ms + self.tuning.respawn_delay_ms as f64,
        });
    }

    /// Serve every queued ball whose delay has elapsed. Serves that come due
    /// after the match ended are dropped.
    pub fn fire_due_serves(&mut self) {
        let now = self.time_ms;
        let (due, waiting): (Vec<_>, Vec<_>) = self
            .pending_serves
            .iter()
            .partition(|serve| serve.due_ms <= now);
        self.pending_serves = waiting;

        for _ in due {
            if self.is_over() {
                log::debug!("Dropping serve that came due after match end");
                continue;
            }
            self.serve_ball();
        }
    }

    /// Credit a point and end the match if it was the winning one
    pub fn award_point(&mut self, scorer: Side) {
        if self.is_over() {
            return;
        }
        self.players[scorer.index()].increment_score();
        self.events.push(GameEvent::PointScored { scorer });
        log::info!(
            "Point to {} ({} - {})",
            self.player(scorer).name,
            self.players[0].score,
            self.players[1].score
        );

        self.schedule_serve();

        if self.player(scorer).score >= self.tuning.win_score {
            self.phase = MatchPhase::GameOver;
            self.events.push(GameEvent::MatchEnded { winner: scorer });
            log::info!("Match over, {} wins", self.player(scorer).name);
        }
    }

    /// Mirror the authoritative player scores onto the scoreboard
    pub fn sync_scoreboard(&mut self) {
        self.scoreboard
            .update_score(Some(self.players[0].score), Some(self.players[1].score));
    }

    /// Follow a new physical surface size. Returns true if anything moved.
    pub fn sync_surface(&mut self, physical: Surface) -> bool {
        let orientation = Orientation::of(physical);
        let logical = orientation.logical(physical);
        if orientation != self.orientation {
            log::info!("Orientation changed to {:?}", orientation);
            self.orientation = orientation;
        }
        if logical == self.surface {
            return false;
        }

        let delta = self.surface.delta_to(logical);
        log::debug!(
            "Surface {}x{} -> {}x{}",
            self.surface.width,
            self.surface.height,
            logical.width,
            logical.height
        );
        for entity in self.paddles.iter_mut().chain(self.balls.iter_mut()) {
            entity.body.rebase(delta);
        }
        self.ball_template.rebase(delta);
        self.scoreboard.anchor.rebase(delta);
        self.surface = logical;
        true
    }

    /// Snapshot for the history store
    pub fn result(&self) -> MatchResult {
        MatchResult {
            player1: PlayerResult {
                name: self.players[0].name.clone(),
                score: self.players[0].score,
            },
            player2: PlayerResult {
                name: self.players[1].name.clone(),
                score: self.players[1].score,
            },
            mode: self.mode,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
