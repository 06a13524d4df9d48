//! Keyboard and touch input
//!
//! Devices only record what the host reports. [`read_commands`] turns the
//! current device state into one [`PaddleCommand`] per side.

use std::collections::HashSet;

use glam::Vec2;

use super::screen::ScreenTracker;
use crate::sim::{PaddleCommand, Side};

/// Pressed-key set keyed by `KeyboardEvent.code`
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    down: HashSet<String>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: &str) {
        self.down.insert(code.to_string());
    }

    pub fn release(&mut self, code: &str) {
        self.down.remove(code);
    }

    pub fn is_down(&self, code: &str) -> bool {
        self.down.contains(code)
    }

    /// Forget everything, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.down.clear();
    }
}

/// Active touches in the order they started, client coordinates
#[derive(Debug, Clone, Default)]
pub struct Touchscreen {
    touches: Vec<(i32, Vec2)>,
}

impl Touchscreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// touchstart / touchmove
    pub fn set(&mut self, id: i32, client: Vec2) {
        match self.touches.iter_mut().find(|(t, _)| *t == id) {
            Some((_, pos)) => *pos = client,
            None => self.touches.push((id, client)),
        }
    }

    /// touchend / touchcancel
    pub fn remove(&mut self, id: i32) {
        self.touches.retain(|(t, _)| *t != id);
    }

    pub fn clear(&mut self) {
        self.touches.clear();
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.touches.iter().map(|(_, pos)| *pos)
    }
}

/// Key codes steering one paddle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddleKeys {
    pub up: String,
    pub down: String,
}

impl PaddleKeys {
    pub fn new(up: &str, down: &str) -> Self {
        Self {
            up: up.to_string(),
            down: down.to_string(),
        }
    }

    pub fn for_side(side: Side) -> Self {
        match side {
            Side::Left => Self::new("KeyW", "KeyS"),
            Side::Right => Self::new("ArrowUp", "ArrowDown"),
        }
    }

    /// -1 up, +1 down, 0 idle. Up wins when both are held.
    pub fn intent(&self, keyboard: &Keyboard) -> i8 {
        if keyboard.is_down(&self.up) {
            -1
        } else if keyboard.is_down(&self.down) {
            1
        } else {
            0
        }
    }
}

/// Keyboard and touch state feeding both paddles
#[derive(Debug, Clone)]
pub struct InputDevices {
    pub keyboard: Keyboard,
    pub touchscreen: Touchscreen,
    pub keys: [PaddleKeys; 2],
}

impl Default for InputDevices {
    fn default() -> Self {
        Self {
            keyboard: Keyboard::new(),
            touchscreen: Touchscreen::new(),
            keys: [PaddleKeys::for_side(Side::Left), PaddleKeys::for_side(Side::Right)],
        }
    }
}

impl InputDevices {
    pub fn commands(&self, screen: &ScreenTracker) -> [PaddleCommand; 2] {
        read_commands(&self.keyboard, &self.touchscreen, &self.keys, screen)
    }
}

/// Current paddle commands, indexed by [`Side::index`].
///
/// A held key beats a touch for the same paddle. Each half of the table is
/// claimed by the first touch that lands in it; later touches in an already
/// claimed half are ignored.
pub fn read_commands(
    keyboard: &Keyboard,
    touchscreen: &Touchscreen,
    keys: &[PaddleKeys; 2],
    screen: &ScreenTracker,
) -> [PaddleCommand; 2] {
    let mut targets: [Option<f32>; 2] = [None, None];
    let half = screen.logical().width / 2.0;
    for client in touchscreen.points() {
        let point = screen.to_logical(client);
        let side = if point.x < half { Side::Left } else { Side::Right };
        let slot = &mut targets[side.index()];
        if slot.is_some() {
            continue;
        }
        *slot = Some(point.y);
    }

    let mut commands = [PaddleCommand::Idle; 2];
    for side in Side::BOTH {
        let intent = keys[side.index()].intent(keyboard);
        commands[side.index()] = match (intent, targets[side.index()]) {
            (0, Some(y)) => PaddleCommand::Target(y),
            (0, None) => PaddleCommand::Idle,
            (dir, _) => PaddleCommand::Move(dir),
        };
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Surface;

    fn landscape() -> ScreenTracker {
        ScreenTracker::new(Surface::new(800.0, 600.0))
    }

    #[test]
    fn test_keyboard_sets() {
        let mut kb = Keyboard::new();
        kb.press("KeyW");
        kb.press("KeyW");
        assert!(kb.is_down("KeyW"));
        kb.release("KeyW");
        assert!(!kb.is_down("KeyW"));
    }

    #[test]
    fn test_default_bindings() {
        let mut devices = InputDevices::default();
        devices.keyboard.press("KeyS");
        devices.keyboard.press("ArrowUp");
        let commands = devices.commands(&landscape());
        assert_eq!(commands, [PaddleCommand::Move(1), PaddleCommand::Move(-1)]);
    }

    #[test]
    fn test_up_wins_over_down() {
        let mut kb = Keyboard::new();
        kb.press("KeyW");
        kb.press("KeyS");
        assert_eq!(PaddleKeys::for_side(Side::Left).intent(&kb), -1);
    }

    #[test]
    fn test_touch_halves() {
        let mut devices = InputDevices::default();
        devices.touchscreen.set(7, Vec2::new(100.0, 250.0));
        devices.touchscreen.set(3, Vec2::new(700.0, 420.0));
        let commands = devices.commands(&landscape());
        assert_eq!(
            commands,
            [PaddleCommand::Target(250.0), PaddleCommand::Target(420.0)]
        );

        // Moving a touch updates it in place, lifting it frees the half
        devices.touchscreen.set(7, Vec2::new(120.0, 90.0));
        devices.touchscreen.remove(3);
        let commands = devices.commands(&landscape());
        assert_eq!(commands, [PaddleCommand::Target(90.0), PaddleCommand::Idle]);
    }

    #[test]
    fn test_first_touch_claims_half() {
        let mut devices = InputDevices::default();
        devices.touchscreen.set(1, Vec2::new(100.0, 50.0));
        devices.touchscreen.set(2, Vec2::new(200.0, 500.0));
        let commands = devices.commands(&landscape());
        assert_eq!(commands[0], PaddleCommand::Target(50.0));
    }

    #[test]
    fn test_second_touch_in_half_does_not_block_other_half() {
        let mut devices = InputDevices::default();
        devices.touchscreen.set(1, Vec2::new(100.0, 50.0));
        devices.touchscreen.set(2, Vec2::new(150.0, 70.0));
        devices.touchscreen.set(3, Vec2::new(700.0, 500.0));
        let commands = devices.commands(&landscape());
        assert_eq!(
            commands,
            [PaddleCommand::Target(50.0), PaddleCommand::Target(500.0)]
        );
    }

    #[test]
    fn test_key_beats_touch_per_paddle() {
        let mut devices = InputDevices::default();
        devices.keyboard.press("KeyW");
        devices.touchscreen.set(1, Vec2::new(100.0, 50.0));
        devices.touchscreen.set(2, Vec2::new(700.0, 500.0));
        let commands = devices.commands(&landscape());
        assert_eq!(commands, [PaddleCommand::Move(-1), PaddleCommand::Target(500.0)]);
    }

    #[test]
    fn test_portrait_touch_is_rotated() {
        // 600x800 portrait plays as an 800x600 table
        let screen = ScreenTracker::new(Surface::new(600.0, 800.0));
        let mut devices = InputDevices::default();
        // Top of the physical screen is the left end of the table
        devices.touchscreen.set(1, Vec2::new(450.0, 100.0));
        let commands = devices.commands(&screen);
        assert_eq!(commands, [PaddleCommand::Target(150.0), PaddleCommand::Idle]);
    }
}
