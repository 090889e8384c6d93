//! Epidemic Billiards - epidemic spread as elastic billiard collisions
//!
//! Core modules:
//! - `sim`: Bodies, arena walls, collisions and the SIR/SIRS state machine
//! - `chart`: Count history and live chart geometry
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Run parameters, validation and persistence of the form

pub mod chart;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use chart::History;
pub use error::{Error, Result};
pub use settings::Settings;

/// Simulation configuration constants
pub mod consts {
    /// Frames whose measured delta reaches this many seconds are skipped
    /// (tab switches, dropped frames)
    pub const MAX_FRAME_DT: f32 = 0.160;

    /// Arena used when the host has not reported a surface yet
    pub const DEFAULT_ARENA_WIDTH: f32 = 1280.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 800.0;
    /// Control panel occupying the top-right corner of the surface
    pub const DEFAULT_PANEL_WIDTH: f32 = 400.0;
    pub const DEFAULT_PANEL_HEIGHT: f32 = 620.0;

    /// Record one chart sample every this many frames
    pub const CHART_SKIP_RATE: u32 = 2;
    /// Chart y axis runs to population times this
    pub const CHART_HEADROOM: f32 = 1.13;
    /// Spacing of axis tick marks (px)
    pub const CHART_TICK_SPACING: f32 = 30.0;
    /// Inset of the axes from the chart's left and bottom edges (px)
    pub const CHART_AXIS_INSET: f32 = 5.0;
}
