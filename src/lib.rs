//! Ball Panels - throwable discs bouncing around bounded panels
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collisions, friction, panels, throwing)
//! - `persistence`: Save/load of ball records through pluggable backends
//! - `settings`: Data-driven configuration
//! - `error`: Crate error taxonomy

pub mod error;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::{PanelSettings, Settings};

use glam::DVec2;

/// Tuning constants
pub mod consts {
    /// Disc diameter in pixels (shared by every ball)
    pub const BALL_DIAMETER: f64 = 40.0;
    /// Speeds at or below this (per axis) snap to rest
    pub const VELOCITY_THRESHOLD: f64 = 0.01;
    /// Multiplier applied to the average gesture velocity on drop
    pub const THROW_SCALE: f64 = 5.0;
    /// Default per-tick velocity damping
    pub const FRICTION_FACTOR: f64 = 0.995;
    /// Interval between autosaves while autosave is enabled
    pub const AUTOSAVE_INTERVAL_MS: f64 = 1000.0;
    /// Balls spawned into the first panel of a fresh board
    pub const INITIAL_BALLS: usize = 20;
    /// Darkening applied to a ball color for the far end of its gradient
    pub const GRADIENT_SHADE: i16 = -142;
}

/// Unit vector pointing from `from` to `to`.
///
/// Coincident points have no direction; `+x` is used so the result is
/// always finite and repeatable.
#[inline]
pub fn direction_or_x(from: DVec2, to: DVec2) -> DVec2 {
    (to - from).try_normalize().unwrap_or(DVec2::X)
}

/// True when both components are finite
#[inline]
pub fn is_finite(v: DVec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
