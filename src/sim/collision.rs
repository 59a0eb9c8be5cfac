//! Collision resolution between equal discs and panel walls
//!
//! One pass pops balls off the panel's collection (last inserted first),
//! bounces each off the walls, then tests it against every ball still
//! pending. Corrections are written straight back into both balls so a
//! chain of contacts propagates within a single pass.

use glam::DVec2;

use super::ball::Ball;
use crate::{direction_or_x, is_finite};

/// Outcome of a resolver pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolution {
    /// At least one ball has nonzero velocity afterwards
    pub moving: bool,
    /// Overlapping pairs that were pushed apart
    pub contacts: usize,
}

/// Run one resolver pass over `balls`.
///
/// `extent` is the interior size of the panel: ball centers belong in
/// `[0, extent.x] x [0, extent.y]`. The collection comes back in the order
/// balls were resolved, i.e. reversed.
///
/// A panel with no room on some axis only contains: balls stack instead of
/// pushing each other apart.
pub fn resolve(balls: &mut Vec<Ball>, extent: DVec2, diameter: f64) -> Resolution {
    let mut pending = std::mem::take(balls);
    let mut resolved = Vec::with_capacity(pending.len());
    let mut result = Resolution::default();
    let roomy = extent.x > 0.0 && extent.y > 0.0;

    while let Some(mut ball) = pending.pop() {
        if !ball.is_held() {
            sanitize(&mut ball);
            contain(&mut ball, extent);

            let others = pending.iter_mut().filter(|b| roomy && !b.is_held());
            for other in others {
                if separate(&mut ball, other, diameter) {
                    result.contacts += 1;
                }
            }
        }

        result.moving |= ball.is_moving();
        resolved.push(ball);
    }

    *balls = resolved;
    result
}

/// Bounce a ball off whichever walls it touches while heading outward
pub fn contain(ball: &mut Ball, extent: DVec2) {
    contain_axis(&mut ball.pos.x, &mut ball.vel.x, extent.x);
    contain_axis(&mut ball.pos.y, &mut ball.vel.y, extent.y);
}

/// Reflect only when at or past a wall and not already moving away from it.
/// The rebound is at least as fast as the overshoot. An axis without room
/// pins the ball to the origin on that axis.
fn contain_axis(pos: &mut f64, vel: &mut f64, extent: f64) {
    if extent <= 0.0 {
        *pos = 0.0;
        *vel = 0.0;
    } else if *pos <= 0.0 && *vel <= 0.0 {
        *vel = -vel.min(*pos);
        *pos = 0.0;
    } else if *pos >= extent && *vel >= 0.0 {
        *vel = -vel.max(*pos - extent);
        *pos = extent;
    }
}

/// Push two overlapping balls apart and exchange velocity along the
/// contact normal. Returns false when they do not overlap.
///
/// Each ball moves half the penetration depth. The exchange projects onto
/// `shift / penetration` (half the unit normal) and adds the positional
/// shift into both dot products; this matches the saved-game behavior
/// players already have and is kept as is.
pub fn separate(ball: &mut Ball, other: &mut Ball, diameter: f64) -> bool {
    let dist_sq = ball.pos.distance_squared(other.pos);
    if dist_sq >= diameter * diameter {
        return false;
    }

    let penetration = diameter - dist_sq.sqrt();
    let normal = direction_or_x(ball.pos, other.pos);
    let shift = normal * (penetration / 2.0);

    ball.pos -= shift;
    other.pos += shift;

    let axis = shift / penetration;
    let dot = (ball.vel + shift).dot(axis);
    let other_dot = (other.vel - shift).dot(axis);
    let exchange = axis * (other_dot - dot);

    ball.vel += exchange;
    other.vel -= exchange;
    true
}

/// Non-finite state never leaves the resolver
fn sanitize(ball: &mut Ball) {
    if !is_finite(ball.pos) {
        log::warn!("{} had non-finite position {:?}, reset to origin", ball.id, ball.pos);
        ball.pos = DVec2::ZERO;
    }
    if !is_finite(ball.vel) {
        log::warn!("{} had non-finite velocity {:?}, stopped", ball.id, ball.vel);
        ball.vel = DVec2::ZERO;
    }
}
