//! Screen size and orientation tracking
//!
//! The table is always laid out in landscape. On a portrait screen the
//! logical table is the physical one turned a quarter turn: logical x runs
//! down the screen, logical y runs from right to left.

use glam::Vec2;

use crate::sim::{Orientation, Surface};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTracker {
    physical: Surface,
    orientation: Orientation,
}

impl ScreenTracker {
    pub fn new(physical: Surface) -> Self {
        Self {
            physical,
            orientation: Orientation::of(physical),
        }
    }

    /// Record a new physical size. Returns true if anything changed.
    pub fn update(&mut self, physical: Surface) -> bool {
        if physical == self.physical {
            return false;
        }
        let orientation = Orientation::of(physical);
        if orientation != self.orientation {
            log::debug!("Orientation changed to {:?}", orientation);
        }
        self.physical = physical;
        self.orientation = orientation;
        true
    }

    pub fn physical(&self) -> Surface {
        self.physical
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_landscape(&self) -> bool {
        self.orientation == Orientation::Landscape
    }

    pub fn logical(&self) -> Surface {
        self.orientation.logical(self.physical)
    }

    /// Physical client point to table coordinates
    pub fn to_logical(&self, client: Vec2) -> Vec2 {
        match self.orientation {
            Orientation::Landscape => client,
            Orientation::Portrait => Vec2::new(client.y, self.physical.width - client.x),
        }
    }
}
