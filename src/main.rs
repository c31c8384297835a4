//! Snake Scenes entry point
//!
//! The browser build paints to a canvas and runs on `requestAnimationFrame`.
//! The native build plays a headless game with a simple autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use snake_scenes::audio::WebAudio;
    use snake_scenes::campaign::{self, Collaborators};
    use snake_scenes::platform::{BrowserFetch, ImageSurface, direction_for_key};
    use snake_scenes::renderer::canvas::CanvasRenderer;
    use snake_scenes::{FrameStatus, GameConfig, Session};

    const CANVAS_ID: &str = "snake_canvas";
    const SCORE_LABEL_ID: &str = "score_label";
    const MEDIA_IMAGE_ID: &str = "scene_media";

    fn setup_keyboard(session: Rc<RefCell<Session>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if let Some(direction) = direction_for_key(&event.key()) {
                event.prevent_default();
                session.borrow_mut().steer(direction);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(session: Rc<RefCell<Session>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(session, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(session: Rc<RefCell<Session>>, time: f64) {
        let status = session.borrow_mut().on_frame(time);
        match status {
            FrameStatus::Continue => request_animation_frame(session),
            FrameStatus::Finished(report) => {
                log::info!(
                    "Game finished: {} with score {} after {} ticks",
                    report.outcome.as_str(),
                    report.score,
                    report.ticks
                );
                // A new game starts from a fresh page
                if let Some(window) = web_sys::window() {
                    let _ = window.location().reload();
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger unavailable: {e}").into());
        }

        log::info!("Snake Scenes starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or("no canvas")?
            .dyn_into()?;

        let config = GameConfig::load();
        let renderer = CanvasRenderer::new(
            document,
            &canvas,
            config.board_size,
            config.scale_factor,
            config.cell_padding,
            SCORE_LABEL_ID,
        )
        .ok_or("no 2d context")?;

        let sound = Rc::new(WebAudio::new(config.effective_volume()));
        let collaborators = Collaborators::new(sound)
            .with_media(Rc::new(BrowserFetch), Rc::new(ImageSurface::new(MEDIA_IMAGE_ID)));
        let scenes = campaign::build(&config.scenario, &collaborators);

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(&config, seed, Box::new(renderer), scenes)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let session = Rc::new(RefCell::new(session));

        setup_keyboard(session.clone());
        request_animation_frame(session);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::rc::Rc;

    use snake_scenes::audio::Silence;
    use snake_scenes::campaign::{self, Collaborators};
    use snake_scenes::renderer::LogRenderer;
    use snake_scenes::sim::{Direction, GameState, manhattan_distance};
    use snake_scenes::{FrameStatus, GameConfig, GameReport, Session};

    /// Simulated display refresh
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up on games that never end
    const MAX_FRAMES: u64 = 1_000_000;

    /// Greedy steering: the safe turn that gets closest to the fruit
    pub fn autopilot(state: &GameState) -> Option<Direction> {
        let snake = &state.snake;
        Direction::ALL
            .into_iter()
            .filter(|d| *d != snake.moved.opposite())
            .map(|d| (d, snake.head + d.vector()))
            .filter(|(_, next)| state.board.contains(*next) && !snake.occupies(*next))
            .min_by_key(|(_, next)| manhattan_distance(*next, state.fruit.position))
            .map(|(d, _)| d)
    }

    pub fn play(config: &GameConfig, seed: u64) -> Option<GameReport> {
        let collaborators = Collaborators::new(Rc::new(Silence));
        let scenes = campaign::build(&config.scenario, &collaborators);
        let mut session = match Session::new(config, seed, Box::new(LogRenderer::default()), scenes)
        {
            Ok(session) => session,
            Err(e) => {
                log::error!("Invalid configuration: {e}");
                return None;
            }
        };

        let mut last_scene = session.scenario().active_index();
        for frame in 0..MAX_FRAMES {
            if let Some(direction) = autopilot(session.state()) {
                if direction != session.state().snake.direction {
                    session.steer(direction);
                }
            }
            if let FrameStatus::Finished(report) = session.on_frame(frame as f64 * FRAME_MS) {
                return Some(report);
            }
            let scene = session.scenario().active_index();
            if scene != last_scene {
                log::info!("Scene: {}", session.scenario().active_name().unwrap_or("?"));
                last_scene = scene;
            }
        }
        log::warn!("Stopped after {MAX_FRAMES} frames");
        None
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Snake Scenes (native) starting...");
    log::info!("Playing a headless game - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default()
        });

    let config = snake_scenes::GameConfig::load();
    if let Some(report) = headless::play(&config, seed) {
        println!(
            "Seed {seed}: {} with score {} after {} ticks",
            report.outcome.as_str(),
            report.score,
            report.ticks
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
