//! Game settings and tuning
//!
//! Read from LocalStorage as JSON at startup; every field defaults so older
//! or partial documents still load.

use serde::{Deserialize, Serialize};

/// Grid (snake) game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells per row
    pub width: i32,
    /// Cells per column
    pub height: i32,
    /// Pixel size of one cell
    pub cell_size: f32,
    /// Head position of a fresh board
    pub start: (i32, i32),
    /// Target position of a fresh board
    pub first_target: (i32, i32),
    /// Points per target eaten
    pub reward: u64,
    pub tick_ms: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            cell_size: 20.0,
            start: (10, 10),
            first_target: (5, 5),
            reward: 1,
            tick_ms: 200.0,
        }
    }
}

impl GridConfig {
    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }
}

/// Lane runner tuning (pixel units, per-tick rates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub view_width: f32,
    /// Obstacles are dropped once their top passes this line
    pub view_height: f32,
    pub lanes: i32,
    pub start_lane: i32,
    /// X of lane 0
    pub lane_origin: f32,
    pub lane_spacing: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub ground_y: f32,
    /// Player y while airborne
    pub jump_y: f32,
    pub jump_ms: f64,
    pub spawn_chance: f64,
    pub obstacle_width: f32,
    pub obstacle_height: f32,
    pub spawn_y: f32,
    pub base_speed: f32,
    /// Added to speed every tick, uncapped
    pub speed_ramp: f32,
    /// Ticks per displayed point
    pub score_divisor: u64,
    pub tick_ms: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            view_width: 800.0,
            view_height: 600.0,
            lanes: 3,
            start_lane: 1,
            lane_origin: 300.0,
            lane_spacing: 100.0,
            player_width: 40.0,
            player_height: 60.0,
            ground_y: 500.0,
            jump_y: 400.0,
            jump_ms: 500.0,
            spawn_chance: 0.02,
            obstacle_width: 80.0,
            obstacle_height: 50.0,
            spawn_y: -50.0,
            base_speed: 2.0,
            speed_ramp: 0.001,
            score_divisor: 100,
            tick_ms: 16.0,
        }
    }
}

impl RunnerConfig {
    /// Left edge of a lane
    pub fn lane_x(&self, lane: i32) -> f32 {
        self.lane_origin + lane as f32 * self.lane_spacing
    }

    pub fn max_lane(&self) -> i32 {
        (self.lanes - 1).max(0)
    }
}

/// Input tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Swipes shorter than this (on both axes) are discarded as noise
    pub swipe_min_distance: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            swipe_min_distance: 30.0,
        }
    }
}

/// All arcade settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub grid: GridConfig,
    pub runner: RunnerConfig,
    pub input: InputConfig,
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "mini_arcade_settings";

    /// Parse a JSON document, defaulting missing fields
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                None
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
