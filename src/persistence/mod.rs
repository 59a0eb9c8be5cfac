//! Save/load of ball state
//!
//! Features:
//! - Flat record list, one entry per ball, tagged with its panel index
//! - Separate persisted autosave flag
//! - Pluggable backends chosen once at startup (`memory`, `file`, `local`)

pub mod backend;
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local;
pub mod memory;

pub use backend::{StorageBackend, StorageKind};
pub use file::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::sim::{Ball, Rgb};

/// One persisted ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallRecord {
    /// Index of the owning panel
    pub panel: usize,
    pub x: f64,
    pub y: f64,
    /// Horizontal velocity
    pub u: f64,
    /// Vertical velocity
    pub v: f64,
    pub color: Rgb,
}

impl BallRecord {
    pub fn new(panel: usize, x: f64, y: f64, u: f64, v: f64, color: Rgb) -> Self {
        Self {
            panel,
            x,
            y,
            u,
            v,
            color,
        }
    }

    pub fn from_ball(panel: usize, ball: &Ball) -> Self {
        Self::new(panel, ball.pos.x, ball.pos.y, ball.vel.x, ball.vel.y, ball.color)
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn velocity(&self) -> DVec2 {
        DVec2::new(self.u, self.v)
    }
}

/// Key-value persistence consumed by the board.
///
/// A save is a complete snapshot; a later save supersedes it.
pub trait Storage {
    /// Replace the stored balls
    fn save(&mut self, records: &[BallRecord]) -> Result<()>;

    /// Last saved balls, or `None` if nothing was ever saved
    fn load(&self) -> Result<Option<Vec<BallRecord>>>;

    fn set_autosave(&mut self, enabled: bool) -> Result<()>;

    fn autosave(&self) -> Result<bool>;

    /// Forget the stored balls. The autosave flag survives.
    fn clear(&mut self) -> Result<()>;
}
