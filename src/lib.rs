//! Pocket Arcade - casual browser mini-games on a shared simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board physics, arcade loop, round lifecycle)
//! - `host`: Start/complete/back contract between the platform shell and a game
//! - `levels`: Per-game level parameter tables
//! - `tuning`: Data-driven game balance
//! - `records`: Best results per level

pub mod error;
pub mod host;
pub mod levels;
pub mod records;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, ConfigResult};
pub use host::{GameHost, HostInput, MiniGame};
pub use levels::{Difficulty, GameKind, LevelData, LevelParams};
pub use records::LevelRecords;
pub use tuning::Tuning;

use glam::Vec2;

/// Timing constants
pub mod consts {
    /// Board physics tick (60 Hz); velocities are per tick
    pub const BOARD_TICK_MS: f64 = 1000.0 / 60.0;
    /// Round countdown resolution
    pub const COUNTDOWN_MS: f64 = 1000.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the timers will account for
    pub const MAX_FRAME_MS: f64 = 100.0;
}

/// Unit vector for an angle in screen coordinates
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
