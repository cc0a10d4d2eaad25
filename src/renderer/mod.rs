//! Rendering
//!
//! Engines never draw while ticking. After a tick settles, the scene
//! painters in [`scene`] read engine state and issue primitive calls on a
//! [`RenderSink`]: background first, then entities.

pub mod scene;

pub use scene::{draw_grid, draw_runner};

use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const TEAL: Color = Color::rgb(0x4e, 0xcd, 0xc4);
    pub const CORAL: Color = Color::rgb(0xff, 0x6b, 0x6b);
    pub const ASPHALT: Color = Color::rgb(0x33, 0x33, 0x33);
    pub const LANE_LINE: Color = Color::rgb(0x55, 0x55, 0x55);

    /// CSS hex string (`#rrggbb`)
    pub fn css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A 2D drawing surface
pub trait RenderSink {
    /// Fill the whole surface
    fn clear(&mut self, color: Color);
    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);
}

/// One recorded primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Clear(Color),
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
    Circle { x: f32, y: f32, radius: f32, color: Color },
}

/// Headless sink that keeps every primitive, for tests and native runs
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub commands: Vec<DrawCommand>,
    /// Number of `clear` calls, i.e. frames drawn
    pub frames: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitives of the most recent frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .unwrap_or(0);
        &self.commands[start..]
    }
}

impl RenderSink for RecordingSink {
    fn clear(&mut self, color: Color) {
        self.frames += 1;
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCommand::Rect { x, y, w, h, color });
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        self.commands.push(DrawCommand::Circle { x, y, radius, color });
    }
}
