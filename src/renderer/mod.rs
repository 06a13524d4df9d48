//! Canvas rendering module
//!
//! Drawing goes through the [`Painter`] trait so the scene can be built and
//! checked without a browser. Coordinates handed to a painter are always in
//! table (logical) space; painters handle the portrait rotation themselves.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;

use glam::Vec2;

use crate::sim::{Color, Orientation, Surface};

pub use scene::{BACKGROUND, NET_DASH, draw_match, draw_fps};

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2dPainter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Opaque 2D drawing context
pub trait Painter {
    /// Start a frame: clear the table and set up the orientation transform
    fn clear(&mut self, table: Surface, orientation: Orientation, color: Color);
    /// Axis-aligned rectangle given by its center
    fn fill_rect(&mut self, center: Vec2, size: Vec2, color: Color);
    /// Text with its top edge at `pos.y`
    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, align: TextAlign, color: Color);
    /// Dashed line, `dash` is both the dash and gap length
    fn dashed_line(&mut self, from: Vec2, to: Vec2, dash: f32, width: f32, color: Color);
}

/// One recorded painter call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        table: Surface,
        orientation: Orientation,
    },
    Rect {
        center: Vec2,
        size: Vec2,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        align: TextAlign,
    },
    DashedLine {
        from: Vec2,
        to: Vec2,
    },
}

/// Painter that remembers the last frame instead of drawing it
#[derive(Debug, Clone, Default)]
pub struct RecordingPainter {
    pub commands: Vec<DrawCommand>,
    pub frames: u64,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rects(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Rect { center, size, .. } => Some((*center, *size)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Painter for RecordingPainter {
    fn clear(&mut self, table: Surface, orientation: Orientation, _color: Color) {
        self.commands.clear();
        self.frames += 1;
        self.commands.push(DrawCommand::Clear { table, orientation });
    }

    fn fill_rect(&mut self, center: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect {
            center,
            size,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, _size_px: f32, align: TextAlign, _color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            align,
        });
    }

    fn dashed_line(&mut self, from: Vec2, to: Vec2, _dash: f32, _width: f32, _color: Color) {
        self.commands.push(DrawCommand::DashedLine { from, to });
    }
}
