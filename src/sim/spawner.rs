//! Ball identity and randomness source
//!
//! Owned by the board and lent to panels whenever they create balls, so ids
//! stay unique across panels and generation is reproducible from a seed.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ball::{Ball, BallId, Rgb};

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    next_id: u32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a fresh ball id
    pub fn next_id(&mut self) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        id
    }

    /// A resting ball with a random color at a uniform position in
    /// `[0, extent.x] x [0, extent.y]`
    pub fn random_ball(&mut self, extent: DVec2) -> Ball {
        let pos = DVec2::new(
            self.rng.random::<f64>() * extent.x,
            self.rng.random::<f64>() * extent.y,
        );
        let color = Rgb::random(&mut self.rng);
        Ball::new(self.next_id(), pos, DVec2::ZERO, color)
    }

    /// A ball with stored state
    pub fn restored_ball(&mut self, pos: DVec2, vel: DVec2, color: Rgb) -> Ball {
        Ball::new(self.next_id(), pos, vel, color)
    }
}
