//! Mini Arcade - browser-hosted grid snake and lane runner games
//!
//! Core modules:
//! - `sim`: Deterministic engines (grid motion, lane runner, collisions)
//! - `input`: Keyboard and swipe translation into engine commands
//! - `renderer`: Drawing surface contract and scene painters
//! - `arcade`: Fixed-period ticking of the one active game
//! - `highscores`: Best score per game
//! - `settings`: Data-driven game tuning
//! - `platform`: Browser canvas and LocalStorage bindings (wasm32 only)

pub mod arcade;
pub mod highscores;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use arcade::{Arcade, Frame, Ticker};
pub use highscores::{BestScore, MemoryScoreStore, ScoreStore, SharedScoreStore};
pub use input::InputAdapter;
pub use renderer::{Color, RecordingSink, RenderSink};
pub use settings::Settings;
pub use sim::{Command, Direction, Engine, GameEvent, GameKind, RunState, ScoreReport};

/// Arcade-wide constants
pub mod consts {
    /// Maximum ticks run for one animation frame, to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 8;
    /// Longest frame gap accepted from the browser (tab switches, stalls)
    pub const MAX_FRAME_MS: f64 = 250.0;
    /// LocalStorage key prefix for best scores
    pub const BEST_SCORE_PREFIX: &str = "mini_arcade_best_";
}
