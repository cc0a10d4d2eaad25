//! Input adapter
//!
//! Turns keyboard keys and touch swipes into engine [`Command`]s. Both
//! sources produce the same commands, so an engine cannot tell which one
//! the player used. Reversal and lane-range rules live in the engines.

use glam::Vec2;

use crate::sim::{Command, Direction, GameKind};

/// Map a DOM `KeyboardEvent.key` value to a command for the given game
pub fn command_from_key(key: &str, game: GameKind) -> Option<Command> {
    let key = if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    };

    let steer = match key.as_str() {
        "ArrowUp" | "w" => Some(Direction::Up),
        "ArrowDown" | "s" => Some(Direction::Down),
        "ArrowLeft" | "a" => Some(Direction::Left),
        "ArrowRight" | "d" => Some(Direction::Right),
        _ => None,
    };
    if let Some(dir) = steer {
        return Some(Command::Steer(dir));
    }

    match (key.as_str(), game) {
        ("Enter", _) => Some(Command::Start),
        (" ", GameKind::Runner) => Some(Command::Jump),
        (" " | "p" | "Escape", GameKind::Grid) => Some(Command::TogglePause),
        _ => None,
    }
}

/// Direction of a press-to-release displacement, if it is long enough
///
/// The dominant axis wins; an exact tie counts as vertical.
pub fn swipe_direction(delta: Vec2, min_distance: f32) -> Option<Direction> {
    let abs = delta.abs();
    if abs.max_element() < min_distance {
        return None;
    }
    if abs.x > abs.y {
        Some(if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

/// Tracks one touch gesture from press to release
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    min_distance: f32,
    start: Option<Vec2>,
    last: Option<Vec2>,
}

impl SwipeTracker {
    pub fn new(min_distance: f32) -> Self {
        Self {
            min_distance,
            start: None,
            last: None,
        }
    }

    pub fn press(&mut self, x: f32, y: f32) {
        let point = Vec2::new(x, y);
        self.start = Some(point);
        self.last = Some(point);
    }

    pub fn moved(&mut self, x: f32, y: f32) {
        if self.start.is_some() {
            self.last = Some(Vec2::new(x, y));
        }
    }

    /// Finish the gesture at the last known point
    pub fn release(&mut self) -> Option<Direction> {
        let start = self.start.take()?;
        let end = self.last.take().unwrap_or(start);
        swipe_direction(end - start, self.min_distance)
    }

    pub fn cancel(&mut self) {
        self.start = None;
        self.last = None;
    }
}

/// Per-game adapter that feeds both input sources into one command stream
#[derive(Debug, Clone)]
pub struct InputAdapter {
    game: GameKind,
    swipe: SwipeTracker,
}

impl InputAdapter {
    pub fn new(game: GameKind, swipe_min_distance: f32) -> Self {
        Self {
            game,
            swipe: SwipeTracker::new(swipe_min_distance),
        }
    }

    pub fn game(&self) -> GameKind {
        self.game
    }

    pub fn key_down(&self, key: &str) -> Option<Command> {
        command_from_key(key, self.game)
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.swipe.press(x, y);
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        self.swipe.moved(x, y);
    }

    pub fn touch_end(&mut self) -> Option<Command> {
        self.swipe.release().map(Command::Steer)
    }

    pub fn touch_cancel(&mut self) {
        self.swipe.cancel();
    }
}
