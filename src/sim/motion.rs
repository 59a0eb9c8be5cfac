//! Friction-driven integration

use glam::DVec2;

use super::ball::Ball;

/// Advance every ball faster than `threshold` (on either axis) by one tick
/// of its velocity, then damp the velocity by `friction`.
///
/// Slower balls are snapped to rest so motion ends after a finite number of
/// ticks. Returns whether anything moved.
pub fn integrate(balls: &mut [Ball], friction: f64, threshold: f64) -> bool {
    let mut moved = false;

    for ball in balls.iter_mut() {
        if ball.vel.x.abs() > threshold || ball.vel.y.abs() > threshold {
            ball.pos += ball.vel;
            ball.vel *= friction;
            moved = true;
        } else {
            ball.vel = DVec2::ZERO;
        }
    }

    moved
}

/// Upper bound on integrating ticks before a ball launched at `speed`
/// comes to rest
pub fn ticks_to_rest(speed: f64, friction: f64, threshold: f64) -> u32 {
    if speed <= threshold {
        return 0;
    }
    ((threshold / speed).ln() / friction.ln()).ceil() as u32
}
