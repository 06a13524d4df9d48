//! Fixed timestep main loop
//!
//! The host calls [`MainLoop::frame`] from its animation-frame callback. Each
//! frame banks the elapsed wall time and spends it in whole `timestep` slices
//! on `update`, then calls `draw` exactly once with how far into the next
//! slice the leftover time reaches. If a frame needs more than
//! `max_updates_per_frame` slices the loop gives up catching up for that
//! frame and reports a panic to the `end` hook.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::{MAX_UPDATES_PER_FRAME, SIM_DT};
use crate::error::{PongError, Result};

pub type UpdateFn = Box<dyn FnMut(f32)>;
pub type DrawFn = Box<dyn FnMut(f32)>;
pub type EndFn = Box<dyn FnMut(f32, bool) -> LagPolicy>;

/// What to do with unprocessed time at the end of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LagPolicy {
    #[default]
    Keep,
    /// Throw the backlog away instead of simulating it
    Discard,
}

/// Summary of one animation frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub updates: u32,
    pub panic: bool,
    pub fps: f32,
    /// Lag dropped at the end of the frame, in ms
    pub discarded_ms: f32,
}

/// Shared running flag. Lets code inside a phase stop the loop that is
/// calling it.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle(Rc<Cell<bool>>);

impl LoopHandle {
    pub fn is_running(&self) -> bool {
        self.0.get()
    }

    pub fn stop(&self) {
        self.0.set(false);
    }
}

const FPS_ALPHA: f32 = 0.9;
const FPS_UPDATE_INTERVAL_MS: f64 = 1000.0;

pub struct MainLoop {
    timestep: f32,
    max_updates_per_frame: u32,
    min_frame_delay_ms: f64,

    frame_delta: f32,
    last_frame_ms: f64,
    /// start() called and the first frame not seen yet
    priming: bool,
    running: LoopHandle,

    fps: f32,
    last_fps_update_ms: f64,
    frames_since_fps_update: u32,

    update: Option<UpdateFn>,
    draw: Option<DrawFn>,
    end: Option<EndFn>,
}

impl Default for MainLoop {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_UPDATES_PER_FRAME)
    }
}

impl MainLoop {
    pub fn new(timestep: f32, max_updates_per_frame: u32) -> Self {
        Self {
            timestep,
            max_updates_per_frame: max_updates_per_frame.max(1),
            min_frame_delay_ms: 0.0,
            frame_delta: 0.0,
            last_frame_ms: 0.0,
            priming: false,
            running: LoopHandle::default(),
            fps: 60.0,
            last_fps_update_ms: 0.0,
            frames_since_fps_update: 0,
            update: None,
            draw: None,
            end: None,
        }
    }

    pub fn set_update(&mut self, update: impl FnMut(f32) + 'static) -> Result<()> {
        if self.update.is_some() {
            return Err(PongError::CallbackAlreadySet("update"));
        }
        self.update = Some(Box::new(update));
        Ok(())
    }

    pub fn set_draw(&mut self, draw: impl FnMut(f32) + 'static) -> Result<()> {
        if self.draw.is_some() {
            return Err(PongError::CallbackAlreadySet("draw"));
        }
        self.draw = Some(Box::new(draw));
        Ok(())
    }

    pub fn set_end(&mut self, end: impl FnMut(f32, bool) -> LagPolicy + 'static) -> Result<()> {
        if self.end.is_some() {
            return Err(PongError::CallbackAlreadySet("end"));
        }
        self.end = Some(Box::new(end));
        Ok(())
    }

    /// Cap the frame rate; `None` or a non-positive value removes the cap
    pub fn set_max_fps(&mut self, max_fps: Option<f32>) {
        self.min_frame_delay_ms = match max_fps {
            Some(fps) if fps > 0.0 => 1000.0 / fps as f64,
            _ => 0.0,
        };
    }

    pub fn handle(&self) -> LoopHandle {
        self.running.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Unprocessed time, in ms
    pub fn frame_delta(&self) -> f32 {
        self.frame_delta
    }

    /// Begin running. The next frame only primes the clock and draws.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.running.0.set(true);
        self.priming = true;
        self.frame_delta = 0.0;
        log::info!("Main loop started");
    }

    /// Stop running. No update or draw happens after this returns.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.running.stop();
        self.priming = false;
        log::info!("Main loop stopped");
    }

    /// Drop all unprocessed time. Returns how much was dropped.
    pub fn reset_frame_delta(&mut self) -> f32 {
        std::mem::replace(&mut self.frame_delta, 0.0)
    }

    /// Run one animation frame at host time `timestamp_ms`. Returns `None`
    /// when stopped or when the frame was skipped by the fps cap.
    pub fn frame(&mut self, timestamp_ms: f64) -> Option<FrameStats> {
        if !self.is_running() {
            return None;
        }

        if self.priming {
            self.priming = false;
            self.last_frame_ms = timestamp_ms;
            self.last_fps_update_ms = timestamp_ms;
            self.frames_since_fps_update = 0;
            if let Some(draw) = self.draw.as_mut() {
                draw(1.0);
            }
            return Some(FrameStats {
                updates: 0,
                panic: false,
                fps: self.fps,
                discarded_ms: 0.0,
            });
        }

        if timestamp_ms < self.last_frame_ms + self.min_frame_delay_ms {
            return None;
        }

        self.frame_delta += (timestamp_ms - self.last_frame_ms).max(0.0) as f32;
        self.last_frame_ms = timestamp_ms;

        let since_fps_update = timestamp_ms - self.last_fps_update_ms;
        if since_fps_update > FPS_UPDATE_INTERVAL_MS {
            let measured = self.frames_since_fps_update as f64 * 1000.0 / since_fps_update;
            self.fps = FPS_ALPHA * measured as f32 + (1.0 - FPS_ALPHA) * self.fps;
            self.last_fps_update_ms = timestamp_ms;
            self.frames_since_fps_update = 0;
        }
        self.frames_since_fps_update += 1;

        let mut updates = 0;
        let mut panic = false;
        while self.frame_delta >= self.timestep && self.is_running() {
            if let Some(update) = self.update.as_mut() {
                update(self.timestep);
            }
            self.frame_delta -= self.timestep;
            updates += 1;
            if updates >= self.max_updates_per_frame {
                panic = true;
                break;
            }
        }

        if !self.is_running() {
            return Some(FrameStats {
                updates,
                panic,
                fps: self.fps,
                discarded_ms: 0.0,
            });
        }

        if let Some(draw) = self.draw.as_mut() {
            draw(self.frame_delta / self.timestep);
        }

        let mut discarded_ms = 0.0;
        let policy = match self.end.as_mut() {
            Some(end) => end(self.fps, panic),
            None => LagPolicy::Keep,
        };
        if policy == LagPolicy::Discard {
            discarded_ms = self.reset_frame_delta();
        }
        if panic {
            log::warn!(
                "Main loop panic after {} updates, {:.0} ms of lag discarded",
                updates,
                discarded_ms
            );
        }

        Some(FrameStats {
            updates,
            panic,
            fps: self.fps,
            discarded_ms,
        })
    }
}
