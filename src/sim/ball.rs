//! Ball entity and its drag state

use std::fmt;

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Stable identity of a ball across panels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

impl fmt::Display for BallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ball{}", self.0)
    }
}

/// Ball color as three 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Random color, each channel in `1..=255`
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        // ceil(random * 256) lands in 1..=256; the top value saturates
        let mut channel = || rng.random_range(1..=256u16).min(255) as u8;
        Self([channel(), channel(), channel()])
    }

    /// Offset every channel, saturating at 0 and 255
    pub fn shade(self, modifier: i16) -> Self {
        Self(self.0.map(|c| (c as i16 + modifier).clamp(0, 255) as u8))
    }

    /// `#rrggbb` form
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Pointer sample taken when a drag begins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCapture {
    pub pointer: DVec2,
    /// Milliseconds, same clock as the drop event
    pub time: f64,
}

/// Drag state of a ball
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Picked up by the pointer; `rest` is where it was lifted from
    Held { capture: DragCapture, rest: DVec2 },
}

/// A disc owned by exactly one panel
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: BallId,
    /// Center in panel coordinates (`[0,width]x[0,height]` once settled)
    pub pos: DVec2,
    pub vel: DVec2,
    pub color: Rgb,
    pub drag: DragState,
}

impl Ball {
    pub fn new(id: BallId, pos: DVec2, vel: DVec2, color: Rgb) -> Self {
        Self {
            id,
            pos,
            vel,
            color,
            drag: DragState::Idle,
        }
    }

    /// Any nonzero velocity component
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.vel.x.abs() > 0.0 || self.vel.y.abs() > 0.0
    }

    #[inline]
    pub fn is_held(&self) -> bool {
        matches!(self.drag, DragState::Held { .. })
    }

    /// Pick the ball up. It stops dead and leaves the simulation until
    /// dropped or released.
    pub fn grab(&mut self, capture: DragCapture) {
        let rest = match self.drag {
            DragState::Held { rest, .. } => rest,
            DragState::Idle => self.pos,
        };
        self.vel = DVec2::ZERO;
        self.drag = DragState::Held { capture, rest };
    }

    /// Drag ended without a drop: put it back where it was lifted from.
    pub fn release(&mut self) {
        if let DragState::Held { rest, .. } = self.drag {
            self.pos = rest;
        }
        self.vel = DVec2::ZERO;
        self.drag = DragState::Idle;
    }

    /// Consume the drag capture, returning to idle
    pub fn take_capture(&mut self) -> Option<DragCapture> {
        match std::mem::take(&mut self.drag) {
            DragState::Held { capture, .. } => Some(capture),
            DragState::Idle => None,
        }
    }
}
