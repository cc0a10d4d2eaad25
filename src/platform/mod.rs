//! Platform abstraction layer (browser)
//!
//! Handles:
//! - Drawing to a Canvas2D context
//! - Storage (LocalStorage on web)

pub mod canvas;
pub mod storage;

pub use canvas::CanvasSink;
pub use storage::LocalScoreStore;
