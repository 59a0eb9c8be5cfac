//! Deterministic simulation module
//!
//! All physics and interaction logic lives here. This module must be pure
//! and deterministic:
//! - One unit of simulated time per frame
//! - Seeded RNG only
//! - Stable, reproducible resolution order (last inserted ball first)
//! - No rendering or platform dependencies

pub mod ball;
pub mod board;
pub mod collision;
pub mod interaction;
pub mod motion;
pub mod panel;
pub mod spawner;

pub use ball::{Ball, BallId, DragCapture, DragState, Rgb};
pub use board::Board;
pub use collision::{Resolution, contain, resolve, separate};
pub use interaction::{Gesture, throw_velocity};
pub use motion::{integrate, ticks_to_rest};
pub use panel::{Panel, PhysicsParams, Rect};
pub use spawner::Spawner;
