//! Mini Arcade entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use mini_arcade::consts::MAX_FRAME_MS;
    use mini_arcade::platform::{CanvasSink, LocalScoreStore};
    use mini_arcade::{Arcade, Command, GameEvent, GameKind, RunState, Settings};

    /// Game instance holding all state
    struct Game {
        arcade: Arcade,
        sink: CanvasSink,
        last_time: f64,
    }

    impl Game {
        fn switch(&mut self, kind: GameKind) {
            let settings = self.arcade.settings();
            let (w, h) = match kind {
                GameKind::Grid => (
                    settings.grid.width as f32 * settings.grid.cell_size,
                    settings.grid.height as f32 * settings.grid.cell_size,
                ),
                GameKind::Runner => (settings.runner.view_width, settings.runner.view_height),
            };
            self.sink.resize(w as u32, h as u32);
            self.arcade.switch_to(kind, &mut self.sink);
            self.last_time = 0.0;
            show("game-screen", true);
            show("menu", false);
            show("game-over", false);
        }

        fn to_menu(&mut self) {
            self.arcade.stop();
            show("game-screen", false);
            show("game-over", false);
            show("menu", true);
        }

        fn update(&mut self, time: f64) {
            let elapsed = if self.last_time > 0.0 {
                (time - self.last_time).min(MAX_FRAME_MS)
            } else {
                0.0
            };
            self.last_time = time;

            let frame = self.arcade.frame(elapsed, &mut self.sink);
            for event in &frame.events {
                match event {
                    GameEvent::GameOver { score, best } => {
                        set_text("final-score", &score.to_string());
                        set_text("final-best", &best.to_string());
                        show("game-over", true);
                    }
                    GameEvent::NewBest(score) => log::info!("New best: {}", score),
                    GameEvent::Scored(_) => {}
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(report) = self.arcade.report() else {
                return;
            };
            set_text("hud-score", &report.score.to_string());
            set_text("hud-best", &report.best.to_string());
            let status = match report.run_state {
                RunState::Idle => "Press Enter to start",
                RunState::Running => "",
                RunState::Paused => "Paused",
                RunState::Over => "Game over - Enter to play again",
            };
            set_text("hud-status", status);
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn show(id: &str, visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mini Arcade starting...");

        let sink = CanvasSink::from_element_id("arcade-canvas").expect("no canvas");
        let settings = Settings::load();
        let store = Rc::new(RefCell::new(LocalScoreStore::new()));
        let seed = js_sys::Date::now() as u64;

        let game = Rc::new(RefCell::new(Game {
            arcade: Arcade::new(settings, store, seed),
            sink,
            last_time: 0.0,
        }));
        log::info!("Arcade initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_menu(game.clone());

        request_animation_frame(game);

        log::info!("Mini Arcade running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().arcade.key_down(&event.key()).is_some() {
                    // Keep arrows and space from scrolling the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let canvas = game.borrow().sink.canvas().clone();

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut()
                        .arcade
                        .touch_start(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut()
                        .arcade
                        .touch_move(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                // A tap on an idle or finished game starts it
                if g.arcade.touch_end().is_none() {
                    let idle = matches!(
                        g.arcade.report().map(|r| r.run_state),
                        Some(RunState::Idle | RunState::Over)
                    );
                    if idle {
                        g.arcade.command(Command::Start);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch cancel (system gesture, alert, etc.)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().arcade.touch_cancel();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else {
            return;
        };

        // Game cards carry data-game="snake" / data-game="runner"
        if let Ok(cards) = document.query_selector_all("[data-game]") {
            for i in 0..cards.length() {
                let Some(card) = cards
                    .get(i)
                    .and_then(|n| n.dyn_into::<web_sys::Element>().ok())
                else {
                    continue;
                };
                let Some(kind) = card
                    .get_attribute("data-game")
                    .and_then(|g| g.parse::<GameKind>().ok())
                else {
                    log::warn!("Skipping unknown game card");
                    continue;
                };
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().switch(kind);
                });
                let _ = card
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Back to menu
        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().to_menu();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Play again
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.arcade.command(Command::Start);
                show("game-over", false);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mini Arcade (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive both games for a few simulated seconds with canned input
#[cfg(not(target_arch = "wasm32"))]
fn headless_session() {
    use mini_arcade::{Arcade, GameEvent, GameKind, MemoryScoreStore, RecordingSink, Settings};

    let store = MemoryScoreStore::new().shared();
    let mut arcade = Arcade::new(Settings::load(), store, 2024);
    let mut sink = RecordingSink::new();

    for (kind, keys) in [
        (GameKind::Grid, ["Enter", "ArrowLeft", "ArrowUp", "ArrowRight"]),
        (GameKind::Runner, ["Enter", "ArrowLeft", " ", "ArrowRight"]),
    ] {
        arcade.switch_to(kind, &mut sink);
        let mut over = None;
        for step in 0..600 {
            if step % 40 == 0 {
                arcade.key_down(keys[(step / 40) % keys.len()]);
            }
            for event in arcade.frame(1000.0 / 60.0, &mut sink).events {
                if let GameEvent::GameOver { score, best } = event {
                    over = Some((score, best));
                }
            }
            if over.is_some() {
                break;
            }
        }
        match (over, arcade.report()) {
            (Some((score, best)), _) => {
                println!("{:?}: game over, score {} (best {})", kind, score, best)
            }
            (None, Some(report)) => println!(
                "{:?}: still {:?}, score {} (best {})",
                kind, report.run_state, report.score, report.best
            ),
            (None, None) => {}
        }
    }
    arcade.stop();
    println!("{} frames drawn", sink.frames);
}
