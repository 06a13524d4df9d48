//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input devices (keyboard, touch)
//! - Screen size and orientation
//! - Storage (LocalStorage on web, memory elsewhere)

pub mod input;
pub mod screen;
pub mod storage;

pub use input::{InputDevices, Keyboard, PaddleKeys, Touchscreen, read_commands};
pub use screen::ScreenTracker;
pub use storage::{KeyValueStore, MemoryStore};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
