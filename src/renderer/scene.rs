//! Scene drawing for a match

use glam::Vec2;

use super::{Painter, TextAlign};
use crate::sim::{Color, MatchState, Side};

pub const BACKGROUND: Color = Color(0x000000);
/// Net dash length
pub const NET_DASH: f32 = 10.0;
const NET_WIDTH: f32 = 4.0;
const SCORE_FONT_PX: f32 = 48.0;
const FPS_FONT_PX: f32 = 14.0;

/// Draw the table, net, paddles, balls and scoreboard
pub fn draw_match(painter: &mut dyn Painter, state: &MatchState) {
    let table = state.surface;
    painter.clear(table, state.orientation, BACKGROUND);

    let mid = table.width / 2.0;
    painter.dashed_line(
        Vec2::new(mid, 0.0),
        Vec2::new(mid, table.height),
        NET_DASH,
        NET_WIDTH,
        Color::WHITE,
    );

    for paddle in &state.paddles {
        painter.fill_rect(paddle.body.pos(), paddle.body.size, paddle.body.color);
    }
    for ball in &state.balls {
        painter.fill_rect(ball.body.pos(), ball.body.size, ball.body.color);
    }

    let board = &state.scoreboard;
    let (left, right) = board.labels();
    let origin = board.anchor.pos;
    painter.fill_text(
        &left,
        origin - Vec2::new(board.gap, 0.0),
        SCORE_FONT_PX,
        TextAlign::Right,
        Color::WHITE,
    );
    painter.fill_text(
        &right,
        origin + Vec2::new(board.gap, 0.0),
        SCORE_FONT_PX,
        TextAlign::Left,
        Color::WHITE,
    );

    if state.is_over() {
        let winner = match state.result().winner() {
            Some(Side::Left) => state.player(Side::Left).name.as_str(),
            Some(Side::Right) => state.player(Side::Right).name.as_str(),
            None => "Nobody",
        };
        painter.fill_text(
            &format!("{} wins!", winner),
            table.center(),
            SCORE_FONT_PX,
            TextAlign::Center,
            Color::WHITE,
        );
    }
}

/// FPS counter in the bottom-left corner
pub fn draw_fps(painter: &mut dyn Painter, state: &MatchState, fps: f32) {
    painter.fill_text(
        &format!("{:.0} fps", fps),
        Vec2::new(8.0, state.surface.height - FPS_FONT_PX - 8.0),
        FPS_FONT_PX,
        TextAlign::Left,
        Color(0x808080),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, RecordingPainter};
    use crate::sim::{GameMode, Player, Surface};
    use crate::tuning::Tuning;

    fn state() -> MatchState {
        MatchState::new(
            Tuning::default(),
            GameMode::TwoPlayers,
            Player::new("Ada"),
            Player::new("Bob"),
            Surface::new(800.0, 600.0),
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_scene_contents() {
        let mut state = state();
        state.scoreboard.update_score(Some(3), Some(12));
        let mut painter = RecordingPainter::new();
        draw_match(&mut painter, &state);

        assert!(matches!(painter.commands[0], DrawCommand::Clear { .. }));
        assert!(painter.commands.contains(&DrawCommand::DashedLine {
            from: Vec2::new(400.0, 0.0),
            to: Vec2::new(400.0, 600.0),
        }));
        // Two paddles and the served ball
        assert_eq!(painter.rects().count(), 3);
        let texts: Vec<&str> = painter.texts().collect();
        assert_eq!(texts, vec!["03", "12"]);
    }

    #[test]
    fn test_each_frame_starts_fresh() {
        let state = state();
        let mut painter = RecordingPainter::new();
        draw_match(&mut painter, &state);
        draw_match(&mut painter, &state);
        assert_eq!(painter.frames, 2);
        assert_eq!(painter.rects().count(), 3);
    }
}
