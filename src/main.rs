//! Canvas Pong entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use canvas_pong::audio::{AudioManager, SoundEffect};
    use canvas_pong::history::{MatchHistory, now_ms};
    use canvas_pong::platform::{KeyValueStore, LocalStore, MemoryStore};
    use canvas_pong::renderer::Canvas2dPainter;
    use canvas_pong::sim::Surface;
    use canvas_pong::{PongGame, Settings};

    type Game = PongGame<Canvas2dPainter>;

    /// Everything the browser callbacks need
    struct App {
        game: Game,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
    }

    fn js_err(e: canvas_pong::PongError) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{} - settings and history will not persist", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    /// Match the canvas backing store to its CSS size
    fn canvas_surface(canvas: &HtmlCanvasElement) -> Surface {
        let w = canvas.client_width().max(1) as u32;
        let h = canvas.client_height().max(1) as u32;
        if canvas.width() != w || canvas.height() != h {
            canvas.set_width(w);
            canvas.set_height(h);
        }
        Surface::new(w as f32, h as f32)
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Canvas Pong starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let store = Rc::new(RefCell::new(open_store()));
        let settings = Settings::load(store.borrow().as_ref());
        let history = Rc::new(RefCell::new(MatchHistory::load_or_default(
            store.borrow().as_ref(),
        )));

        let surface = canvas_surface(&canvas);
        let seed = js_sys::Date::now() as u64;
        let painter = Canvas2dPainter::new(&canvas).map_err(js_err)?;
        let mut game = Game::from_settings(&settings, surface, seed, painter).map_err(js_err)?;

        {
            let store = store.clone();
            let history = history.clone();
            game.on_ended(move |result| {
                let mut history = history.borrow_mut();
                if let Err(e) = history.add_result(result, now_ms()) {
                    log::warn!("Match not recorded: {}", e);
                    return;
                }
                if let Err(e) = history.save(store.borrow_mut().as_mut()) {
                    log::warn!("Failed to save history: {}", e);
                }
            });
        }

        let mut audio = AudioManager::new();
        audio.configure(&settings);

        game.start();
        let app = Rc::new(RefCell::new(App {
            game,
            audio,
            canvas: canvas.clone(),
        }));

        setup_keyboard(app.clone())?;
        setup_touch(&canvas, app.clone())?;
        request_animation_frame(app);

        log::info!("Game initialized with seed: {}", seed);
        Ok(())
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut app = app.borrow_mut();
                let code = event.code();
                if (code == "Enter" || code == "Space") && app.game.is_over() {
                    app.audio.play(SoundEffect::Button);
                    if let Err(e) = app.game.restart(js_sys::Date::now() as u64) {
                        log::warn!("Restart failed: {}", e);
                    }
                    return;
                }
                app.game.input_mut().keyboard.press(&code);
            });
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow().game.input_mut().keyboard.release(&event.code());
            });
            document.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keys released while unfocused never report keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow().game.input_mut().keyboard.clear();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_touch(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(false);

        for (name, lifting) in [
            ("touchstart", false),
            ("touchmove", false),
            ("touchend", true),
            ("touchcancel", true),
        ] {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let app = app.borrow();
                app.audio.resume();
                let rect = canvas_clone.get_bounding_client_rect();
                let mut input = app.game.input_mut();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    let Some(touch) = touches.get(i) else { continue };
                    if lifting {
                        input.touchscreen.remove(touch.identifier());
                    } else {
                        let client = Vec2::new(
                            touch.client_x() as f32 - rect.left() as f32,
                            touch.client_y() as f32 - rect.top() as f32,
                        );
                        input.touchscreen.set(touch.identifier(), client);
                    }
                }
            });
            canvas.add_event_listener_with_callback_and_add_event_listener_options(
                name,
                closure.as_ref().unchecked_ref(),
                &options,
            )?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut app = app.borrow_mut();
            let surface = canvas_surface(&app.canvas);
            let (_, events) = app.game.frame(time, surface);
            let mode = app.game.mode();
            app.audio.play_events(&events, mode);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Canvas Pong (native) starting...");
    log::info!("Native mode runs a headless demo match - run with `trunk serve` for the web version");

    if let Err(e) = headless::run() {
        log::error!("Demo match failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Two autopilots play a match against each other on a fixed-size table
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::cell::RefCell;
    use std::rc::Rc;

    use canvas_pong::audio::AudioManager;
    use canvas_pong::history::{MatchHistory, now_ms};
    use canvas_pong::platform::MemoryStore;
    use canvas_pong::renderer::RecordingPainter;
    use canvas_pong::sim::{PaddleCommand, Side, Surface, autopilot};
    use canvas_pong::{PongGame, Result, Settings};

    const SURFACE: Surface = Surface {
        width: 800.0,
        height: 600.0,
    };
    /// Give up after this much simulated time
    const MAX_MATCH_MS: f64 = 30.0 * 60.0 * 1000.0;

    pub fn run() -> Result<()> {
        let mut store = MemoryStore::new();
        let settings = Settings::load(&store);
        let seed = now_ms() as u64;

        let mut game = PongGame::from_settings(&settings, SURFACE, seed, RecordingPainter::new())?;
        let mut audio = AudioManager::new();
        audio.configure(&settings);

        let finished = Rc::new(RefCell::new(None));
        {
            let finished = finished.clone();
            game.on_ended(move |result| *finished.borrow_mut() = Some(result.clone()));
        }

        let frame_ms = game.state().tuning.timestep_ms as f64;
        let mode = game.mode();
        game.start();

        let mut time = 0.0;
        while game.is_running() && time < MAX_MATCH_MS {
            steer_left_player(&game);
            let (_, events) = game.frame(time, SURFACE);
            audio.play_events(&events, mode);
            time += frame_ms;
        }

        let Some(result) = finished.borrow_mut().take() else {
            log::warn!("No winner after {:.0} s of play", time / 1000.0);
            return Ok(());
        };

        let mut history = MatchHistory::load(&store)?;
        history.add_result(&result, now_ms())?;
        history.save(&mut store)?;

        if let Some(record) = history.latest() {
            log::info!(
                "Recorded: {} {} - {} {} ({})",
                record.player1.name,
                record.player1.score,
                record.player2.score,
                record.player2.name,
                record.mode
            );
        }
        Ok(())
    }

    /// Press the left player's keys the way the autopilot would
    fn steer_left_player(game: &PongGame<RecordingPainter>) {
        let command = autopilot(&game.state(), Side::Left);
        let mut input = game.input_mut();
        input.keyboard.clear();
        if let PaddleCommand::Move(dir) = command {
            let keys = &input.keys[Side::Left.index()];
            let code = if dir < 0 { keys.up.clone() } else { keys.down.clone() };
            input.keyboard.press(&code);
        }
    }
}
