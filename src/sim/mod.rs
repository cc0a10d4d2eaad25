//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick period per engine
//! - Seeded RNG only
//! - No rendering or platform dependencies (drawing reads state afterwards)

pub mod collision;
pub mod grid;
pub mod runner;

pub use collision::Rect;
pub use grid::GridGame;
pub use runner::{Obstacle, RunnerGame};

use std::str::FromStr;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::renderer::RenderSink;

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    /// Fresh board, waiting for a start command
    #[default]
    Idle,
    /// Ticking
    Running,
    /// Ticks are skipped entirely
    Paused,
    /// Run ended on a collision (terminal until start/reset)
    Over,
}

/// Which game an engine implements (also the best-score key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Grid,
    Runner,
}

impl GameKind {
    /// Key under which the best score is persisted
    pub fn score_key(&self) -> &'static str {
        match self {
            GameKind::Grid => "snake",
            GameKind::Runner => "runner",
        }
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snake" | "grid" => Ok(GameKind::Grid),
            "runner" | "subway" => Ok(GameKind::Runner),
            other => Err(format!("unknown game: {other}")),
        }
    }
}

/// Cardinal direction on the grid (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn to_ivec2(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Player intent, produced by the input adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Grid: steer; Runner: left/right shift lanes, up jumps
    Steer(Direction),
    /// Runner: jump
    Jump,
    /// Start a run (from Over this begins a fresh run)
    Start,
    /// Pause/resume toggle
    TogglePause,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score changed to the given value
    Scored(u64),
    /// A new best score was recorded
    NewBest(u64),
    /// Run ended
    GameOver { score: u64, best: u64 },
}

/// Score/state snapshot emitted after every tick for display binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub game: GameKind,
    pub score: u64,
    pub best: u64,
    pub run_state: RunState,
}

/// Common surface of every arcade engine
///
/// `tick` is the pure state transition; `render` only reads state.
pub trait Engine {
    fn kind(&self) -> GameKind;

    /// Fixed period between ticks, in milliseconds
    fn tick_period_ms(&self) -> f64;

    fn run_state(&self) -> RunState;

    fn start(&mut self);

    fn reset(&mut self);

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    /// Route an input command to the matching engine operation
    fn apply(&mut self, command: Command);

    /// Advance one tick, returning what happened
    fn tick(&mut self) -> Vec<GameEvent>;

    fn render(&self, sink: &mut dyn RenderSink);

    fn report(&self) -> ScoreReport;

    /// Toggle between Running and Paused, no-op otherwise
    fn toggle_pause(&mut self) {
        match self.run_state() {
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
            RunState::Idle | RunState::Over => {}
        }
    }

    /// Start from Idle, or begin a fresh run from Over
    fn restart(&mut self) {
        match self.run_state() {
            RunState::Idle => self.start(),
            RunState::Over => {
                self.reset();
                self.start();
            }
            RunState::Running | RunState::Paused => {}
        }
    }
}
