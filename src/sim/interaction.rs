//! Drag and drop gestures
//!
//! The gesture source itself (pointer capture, drag images) belongs to the
//! host. It reports three kinds of events, and all the core needs from them
//! is positions and timestamps.

use glam::DVec2;

use super::ball::{BallId, DragCapture};
use crate::is_finite;

/// A pointer gesture, in page coordinates and milliseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// A ball was picked up
    Start {
        ball: BallId,
        pointer: DVec2,
        time: f64,
    },
    /// A held ball was released over `target`
    Drop {
        ball: BallId,
        target: usize,
        pointer: DVec2,
        time: f64,
    },
    /// The drag ended somewhere that does not accept drops
    Cancel { ball: BallId },
}

/// Average pointer velocity over the whole gesture, scaled.
///
/// Per axis: `(end - start) / (end_time - start_time) * scale`. A gesture
/// with no measurable duration throws nothing.
pub fn throw_velocity(start: DragCapture, pointer: DVec2, time: f64, scale: f64) -> DVec2 {
    let elapsed = time - start.time;
    if !elapsed.is_finite() || elapsed <= 0.0 {
        log::warn!("Gesture lasted {elapsed} ms, dropping without velocity");
        return DVec2::ZERO;
    }

    let vel = (pointer - start.pointer) / elapsed * scale;
    if is_finite(vel) { vel } else { DVec2::ZERO }
}
