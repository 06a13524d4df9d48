//! Game wrapper
//!
//! Owns one match and the main loop that drives it. The loop callbacks and
//! the wrapper share state through `Rc<RefCell<_>>`; everything runs on the
//! host's animation-frame callback, so borrows never overlap.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::error::Result;
use crate::main_loop::{FrameStats, LagPolicy, MainLoop};
use crate::platform::{InputDevices, ScreenTracker};
use crate::renderer::{Painter, draw_fps, draw_match};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameMode, MatchResult, MatchState, Player, Surface, TickInput, tick};
use crate::tuning::Tuning;

type EndedFn = Box<dyn FnMut(&MatchResult)>;

/// Everything needed to (re)start a match
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub tuning: Tuning,
    pub mode: GameMode,
    pub player1: String,
    pub player2: String,
    pub show_fps: bool,
}

impl GameConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        let (player1, player2) = settings.player_names();
        Self {
            tuning: settings.tuning.clone(),
            mode: settings.mode,
            player1,
            player2,
            show_fps: settings.show_fps,
        }
    }

    fn new_match(&self, physical: Surface, seed: u64) -> Result<MatchState> {
        MatchState::new(
            self.tuning.clone(),
            self.mode,
            Player::new(self.player1.clone()),
            Player::new(self.player2.clone()),
            physical,
            seed,
        )
    }
}

/// State shared between the wrapper and the loop callbacks
struct Shared<P> {
    state: RefCell<MatchState>,
    input: RefCell<InputDevices>,
    screen: RefCell<ScreenTracker>,
    painter: RefCell<P>,
    events: RefCell<Vec<GameEvent>>,
    on_ended: RefCell<Option<EndedFn>>,
    /// Set once the end callback has fired for the current match
    ended: Cell<bool>,
    fps: Cell<f32>,
    show_fps: bool,
}

impl<P: Painter> Shared<P> {
    fn draw(&self) {
        let state = self.state.borrow();
        let mut painter = self.painter.borrow_mut();
        draw_match(&mut *painter, &state);
        if self.show_fps {
            draw_fps(&mut *painter, &state, self.fps.get());
        }
    }

    /// Fire the end callback the first time the match is seen to be over.
    /// Returns true when it fired.
    fn finish_if_over(&self) -> bool {
        if self.ended.get() {
            return false;
        }
        let result = {
            let state = self.state.borrow();
            if !state.is_over() {
                return false;
            }
            state.result()
        };
        self.ended.set(true);
        if let Some(on_ended) = self.on_ended.borrow_mut().as_mut() {
            on_ended(&result);
        }
        true
    }
}

pub struct PongGame<P: Painter + 'static> {
    config: GameConfig,
    main_loop: MainLoop,
    shared: Rc<Shared<P>>,
}

impl<P: Painter + 'static> PongGame<P> {
    pub fn new(config: GameConfig, physical: Surface, seed: u64, painter: P) -> Result<Self> {
        let state = config.new_match(physical, seed)?;
        let shared = Rc::new(Shared {
            state: RefCell::new(state),
            input: RefCell::new(InputDevices::default()),
            screen: RefCell::new(ScreenTracker::new(physical)),
            painter: RefCell::new(painter),
            events: RefCell::new(Vec::new()),
            on_ended: RefCell::new(None),
            ended: Cell::new(false),
            fps: Cell::new(0.0),
            show_fps: config.show_fps,
        });

        let mut main_loop = MainLoop::new(
            config.tuning.timestep_ms,
            config.tuning.max_updates_per_frame,
        );
        let handle = main_loop.handle();

        let s = shared.clone();
        main_loop.set_update(move |dt| {
            let input = {
                let screen = s.screen.borrow();
                let [left, right] = s.input.borrow().commands(&screen);
                TickInput {
                    surface: screen.physical(),
                    left,
                    right,
                }
            };
            {
                let mut state = s.state.borrow_mut();
                tick(&mut state, &input, dt);
                let events = state.drain_events();
                s.events.borrow_mut().extend(events);
            }
            if s.finish_if_over() {
                handle.stop();
            }
        })?;

        let s = shared.clone();
        main_loop.set_draw(move |_interpolation| s.draw())?;

        let s = shared.clone();
        main_loop.set_end(move |fps, panic| {
            s.fps.set(fps);
            if panic {
                LagPolicy::Discard
            } else {
                LagPolicy::Keep
            }
        })?;

        Ok(Self {
            config,
            main_loop,
            shared,
        })
    }

    pub fn from_settings(settings: &Settings, physical: Surface, seed: u64, painter: P) -> Result<Self> {
        Self::new(GameConfig::from_settings(settings), physical, seed, painter)
    }

    /// Called once with the final result when a match ends
    pub fn on_ended(&mut self, on_ended: impl FnMut(&MatchResult) + 'static) {
        *self.shared.on_ended.borrow_mut() = Some(Box::new(on_ended));
    }

    pub fn start(&mut self) {
        if self.shared.ended.get() {
            log::debug!("Match already over, start ignored");
            return;
        }
        self.main_loop.start();
    }

    pub fn stop(&mut self) {
        self.main_loop.stop();
    }

    pub fn is_running(&self) -> bool {
        self.main_loop.is_running()
    }

    /// Throw away the running match and begin a new one
    pub fn restart(&mut self, seed: u64) -> Result<()> {
        let physical = self.shared.screen.borrow().physical();
        let state = self.config.new_match(physical, seed)?;
        *self.shared.state.borrow_mut() = state;
        self.shared.events.borrow_mut().clear();
        self.shared.ended.set(false);
        self.main_loop.stop();
        self.main_loop.start();
        Ok(())
    }

    /// Run one animation frame. `physical` is the current drawing surface
    /// size. Returns the events raised since the last call.
    pub fn frame(&mut self, timestamp_ms: f64, physical: Surface) -> (Option<FrameStats>, Vec<GameEvent>) {
        self.shared.screen.borrow_mut().update(physical);
        let was_running = self.main_loop.is_running();
        let stats = self.main_loop.frame(timestamp_ms);

        // The loop stops mid-frame when the match ends; show the final score
        if was_running && !self.main_loop.is_running() && self.shared.ended.get() {
            self.shared.draw();
        }

        let events = std::mem::take(&mut *self.shared.events.borrow_mut());
        (stats, events)
    }

    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    pub fn state(&self) -> Ref<'_, MatchState> {
        self.shared.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, MatchState> {
        self.shared.state.borrow_mut()
    }

    pub fn input_mut(&self) -> RefMut<'_, InputDevices> {
        self.shared.input.borrow_mut()
    }

    pub fn screen(&self) -> ScreenTracker {
        *self.shared.screen.borrow()
    }

    pub fn painter(&self) -> Ref<'_, P> {
        self.shared.painter.borrow()
    }

    pub fn fps(&self) -> f32 {
        self.main_loop.fps()
    }

    pub fn is_over(&self) -> bool {
        self.shared.ended.get()
    }
}
