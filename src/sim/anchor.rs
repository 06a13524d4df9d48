//! Reference-frame anchoring
//!
//! Entities store an absolute position but remember which point of the
//! surface it was measured from, so a resize can shift them along with
//! their anchor edge instead of leaving them stranded.

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PongError;

/// Drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Size change going from `self` to `next`
    pub fn delta_to(&self, next: Surface) -> Vec2 {
        Vec2::new(next.width - self.width, next.height - self.height)
    }
}

/// Screen orientation. The table is always played in landscape, so a
/// portrait surface is used rotated with width and height swapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl Orientation {
    /// Landscape only when strictly wider than tall
    pub fn of(surface: Surface) -> Self {
        if surface.width > surface.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    /// Size of the table as the simulation sees it
    pub fn logical(&self, physical: Surface) -> Surface {
        match self {
            Orientation::Landscape => physical,
            Orientation::Portrait => Surface::new(physical.height, physical.width),
        }
    }
}

/// Named point of the surface an offset is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceFrame {
    #[default]
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
    CenterLeft,
    CenterRight,
    TopCenter,
    BottomCenter,
}

/// Where an anchor sits along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Near,
    Middle,
    Far,
}

impl Edge {
    fn resolve(self, offset: f32, extent: f32) -> f32 {
        match self {
            Edge::Near => offset,
            Edge::Middle => extent / 2.0 + offset,
            Edge::Far => extent - offset,
        }
    }

    fn shift(self, delta: f32) -> f32 {
        match self {
            Edge::Near => 0.0,
            Edge::Middle => delta / 2.0,
            Edge::Far => delta,
        }
    }
}

impl ReferenceFrame {
    pub const ALL: [ReferenceFrame; 9] = [
        ReferenceFrame::TopLeft,
        ReferenceFrame::TopRight,
        ReferenceFrame::BottomLeft,
        ReferenceFrame::BottomRight,
        ReferenceFrame::Center,
        ReferenceFrame::CenterLeft,
        ReferenceFrame::CenterRight,
        ReferenceFrame::TopCenter,
        ReferenceFrame::BottomCenter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceFrame::TopLeft => "top-left",
            ReferenceFrame::TopRight => "top-right",
            ReferenceFrame::BottomLeft => "bottom-left",
            ReferenceFrame::BottomRight => "bottom-right",
            ReferenceFrame::Center => "center",
            ReferenceFrame::CenterLeft => "center-left",
            ReferenceFrame::CenterRight => "center-right",
            ReferenceFrame::TopCenter => "top-center",
            ReferenceFrame::BottomCenter => "bottom-center",
        }
    }

    /// (horizontal, vertical) anchor edges
    fn edges(&self) -> (Edge, Edge) {
        match self {
            ReferenceFrame::TopLeft => (Edge::Near, Edge::Near),
            ReferenceFrame::TopRight => (Edge::Far, Edge::Near),
            ReferenceFrame::BottomLeft => (Edge::Near, Edge::Far),
            ReferenceFrame::BottomRight => (Edge::Far, Edge::Far),
            ReferenceFrame::Center => (Edge::Middle, Edge::Middle),
            ReferenceFrame::CenterLeft => (Edge::Near, Edge::Middle),
            ReferenceFrame::CenterRight => (Edge::Far, Edge::Middle),
            ReferenceFrame::TopCenter => (Edge::Middle, Edge::Near),
            ReferenceFrame::BottomCenter => (Edge::Middle, Edge::Far),
        }
    }

    /// Absolute position of `offset` measured from this frame
    pub fn resolve(&self, offset: Vec2, surface: Surface) -> Vec2 {
        let (h, v) = self.edges();
        Vec2::new(
            h.resolve(offset.x, surface.width),
            v.resolve(offset.y, surface.height),
        )
    }

    /// How far an anchored point moves when the surface grows by `delta`
    pub fn shift(&self, delta: Vec2) -> Vec2 {
        let (h, v) = self.edges();
        Vec2::new(h.shift(delta.x), v.shift(delta.y))
    }
}

impl FromStr for ReferenceFrame {
    type Err = PongError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReferenceFrame::ALL
            .into_iter()
            .find(|frame| frame.as_str() == s)
            .ok_or_else(|| PongError::UnknownReferenceFrame(s.to_string()))
    }
}

/// An absolute position tied to a reference frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub pos: Vec2,
    frame: ReferenceFrame,
}

impl Anchor {
    pub fn new(offset: Vec2, frame: ReferenceFrame, surface: Surface) -> Self {
        let mut anchor = Self {
            pos: Vec2::ZERO,
            frame,
        };
        anchor.place(offset, frame, surface);
        anchor
    }

    pub fn frame(&self) -> ReferenceFrame {
        self.frame
    }

    /// Compute the absolute position from an offset and remember the frame
    pub fn place(&mut self, offset: Vec2, frame: ReferenceFrame, surface: Surface) {
        self.frame = frame;
        self.pos = frame.resolve(offset, surface);
    }

    /// Follow the anchor edge after the surface changed size by `delta`.
    /// Returns the translation applied.
    pub fn rebase(&mut self, delta: Vec2) -> Vec2 {
        let shift = self.frame.shift(delta);
        self.pos += shift;
        shift
    }
}
