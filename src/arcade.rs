//! Arcade host
//!
//! Owns the one engine that is currently on screen and the fixed-period
//! ticker driving it. Switching games cancels the old ticker and drops the
//! old engine before the new one is built, so nothing ticks in the
//! background. Best scores are read from the store once per game and kept
//! in memory across switches.

use std::collections::HashMap;

use crate::consts::MAX_TICKS_PER_FRAME;
use crate::highscores::{BestScore, SharedScoreStore};
use crate::input::InputAdapter;
use crate::renderer::RenderSink;
use crate::settings::Settings;
use crate::sim::{Command, Engine, GameEvent, GameKind, GridGame, RunState, RunnerGame, ScoreReport};

/// Fixed-period tick scheduler fed with elapsed wall time
#[derive(Debug, Clone)]
pub struct Ticker {
    period_ms: f64,
    accumulator_ms: f64,
    armed: bool,
}

impl Ticker {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(1.0),
            accumulator_ms: 0.0,
            armed: true,
        }
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Stop for good; a cancelled ticker never fires again
    pub fn cancel(&mut self) {
        self.armed = false;
        self.accumulator_ms = 0.0;
    }

    /// Drop accumulated time so nothing queues up while ticks are skipped
    pub fn skip(&mut self) {
        self.accumulator_ms = 0.0;
    }

    /// Add elapsed time and return how many ticks are due
    pub fn advance(&mut self, elapsed_ms: f64) -> u32 {
        if !self.armed || elapsed_ms <= 0.0 {
            return 0;
        }
        self.accumulator_ms += elapsed_ms;

        let mut due = 0;
        while self.accumulator_ms >= self.period_ms && due < MAX_TICKS_PER_FRAME {
            self.accumulator_ms -= self.period_ms;
            due += 1;
        }
        // Prevent spiral of death after a long stall
        if due == MAX_TICKS_PER_FRAME {
            self.accumulator_ms = self.accumulator_ms.min(self.period_ms);
        }
        due
    }
}

/// What a frame produced
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub ticks: u32,
    pub events: Vec<GameEvent>,
    /// One report per tick, in order
    pub reports: Vec<ScoreReport>,
}

struct ActiveGame {
    engine: Box<dyn Engine>,
    ticker: Ticker,
    input: InputAdapter,
}

/// Hosts at most one running game
pub struct Arcade {
    settings: Settings,
    store: SharedScoreStore,
    seed: u64,
    switches: u64,
    /// Best score per game already read from the store
    bests: HashMap<GameKind, u64>,
    current: Option<ActiveGame>,
}

impl Arcade {
    pub fn new(settings: Settings, store: SharedScoreStore, seed: u64) -> Self {
        Self {
            settings,
            store,
            seed,
            switches: 0,
            bests: HashMap::new(),
            current: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn current_kind(&self) -> Option<GameKind> {
        self.current.as_ref().map(|g| g.engine.kind())
    }

    pub fn engine(&self) -> Option<&dyn Engine> {
        self.current.as_ref().map(|g| g.engine.as_ref())
    }

    pub fn report(&self) -> Option<ScoreReport> {
        self.engine().map(|e| e.report())
    }

    /// Cancel whatever is running and leave the arcade on the menu
    pub fn stop(&mut self) {
        if let Some(mut game) = self.current.take() {
            game.ticker.cancel();
            let report = game.engine.report();
            self.bests.insert(report.game, report.best);
            log::info!("Stopped {:?}", report.game);
        }
    }

    /// Replace the current game with a fresh engine of `kind` and draw it once
    pub fn switch_to(&mut self, kind: GameKind, sink: &mut dyn RenderSink) {
        self.stop();

        self.switches += 1;
        let seed = self.seed.wrapping_add(self.switches);
        let best = match self.bests.get(&kind) {
            Some(&value) => BestScore::preloaded(kind.score_key(), value, self.store.clone()),
            None => BestScore::load(kind.score_key(), self.store.clone()),
        };
        let engine: Box<dyn Engine> = match kind {
            GameKind::Grid => Box::new(GridGame::new(self.settings.grid.clone(), best, seed)),
            GameKind::Runner => Box::new(RunnerGame::new(self.settings.runner.clone(), best, seed)),
        };
        let ticker = Ticker::new(engine.tick_period_ms());
        log::info!("Switched to {:?} ({} ms ticks)", kind, ticker.period_ms());

        engine.render(sink);
        self.current = Some(ActiveGame {
            engine,
            ticker,
            input: InputAdapter::new(kind, self.settings.input.swipe_min_distance),
        });
    }

    /// Send a command to the current game
    pub fn command(&mut self, command: Command) {
        if let Some(game) = self.current.as_mut() {
            game.engine.apply(command);
        }
    }

    pub fn key_down(&mut self, key: &str) -> Option<Command> {
        let game = self.current.as_mut()?;
        let command = game.input.key_down(key)?;
        game.engine.apply(command);
        Some(command)
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        if let Some(game) = self.current.as_mut() {
            game.input.touch_start(x, y);
        }
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        if let Some(game) = self.current.as_mut() {
            game.input.touch_move(x, y);
        }
    }

    pub fn touch_end(&mut self) -> Option<Command> {
        let game = self.current.as_mut()?;
        let command = game.input.touch_end()?;
        game.engine.apply(command);
        Some(command)
    }

    /// Forget a gesture the browser interrupted
    pub fn touch_cancel(&mut self) {
        if let Some(game) = self.current.as_mut() {
            game.input.touch_cancel();
        }
    }

    /// Reset the current game and redraw it once
    pub fn reset(&mut self, sink: &mut dyn RenderSink) {
        if let Some(game) = self.current.as_mut() {
            game.engine.reset();
            game.ticker.skip();
            game.engine.render(sink);
        }
    }

    /// Run every tick that is due after `elapsed_ms`, drawing after each one
    pub fn frame(&mut self, elapsed_ms: f64, sink: &mut dyn RenderSink) -> Frame {
        let mut frame = Frame::default();
        let Some(game) = self.current.as_mut() else {
            return frame;
        };

        let due = game.ticker.advance(elapsed_ms);
        for _ in 0..due {
            if game.engine.run_state() != RunState::Running {
                game.ticker.skip();
                break;
            }
            frame.events.extend(game.engine.tick());
            game.engine.render(sink);
            frame.reports.push(game.engine.report());
            frame.ticks += 1;
        }
        if game.engine.run_state() != RunState::Running {
            game.ticker.skip();
        }
        frame
    }
}
