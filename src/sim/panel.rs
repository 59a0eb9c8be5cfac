//! A bounded rectangular simulation domain
//!
//! A panel owns its balls and drives the tick cycle:
//! resolve -> (next frame) integrate -> resolve -> ... until nothing moves.
//! The host's "run this before the next render" primitive is represented by
//! a pending-frame flag which the host polls and clears through [`Panel::frame`].

use glam::DVec2;

use super::ball::{Ball, BallId, DragCapture};
use super::collision::{self, Resolution};
use super::motion;
use super::spawner::Spawner;
use crate::persistence::BallRecord;
use crate::settings::PanelSettings;

/// Simulation constants shared by every panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    pub diameter: f64,
    pub velocity_threshold: f64,
}

impl PhysicsParams {
    #[inline]
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}

/// Rendered size and page offset of a panel's container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Panel {
    index: usize,
    rect: Rect,
    friction: f64,
    initial_balls: usize,
    physics: PhysicsParams,
    balls: Vec<Ball>,
    frame_pending: bool,
    /// Membership changed since the last resolver pass
    needs_resolve: bool,
}

impl Panel {
    pub fn new(index: usize, settings: &PanelSettings, physics: PhysicsParams) -> Self {
        Self {
            index,
            rect: Rect::default(),
            friction: settings.friction,
            initial_balls: settings.initial_balls,
            physics,
            balls: Vec::new(),
            frame_pending: false,
            needs_resolve: false,
        }
    }

    /// Position among the board's attached panels; also the persistence tag
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Interior size: the range ball centers may occupy. Zero on an axis
    /// narrower than one ball (or before the container is laid out).
    pub fn extent(&self) -> DVec2 {
        DVec2::new(
            self.rect.width - self.physics.diameter,
            self.rect.height - self.physics.diameter,
        )
        .max(DVec2::ZERO)
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BallId) -> bool {
        self.ball(id).is_some()
    }

    /// A frame has been requested and not yet run
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Pick up the new container geometry. Only a size change triggers a
    /// resolver pass; returns whether the size changed.
    pub fn resize(&mut self, rect: Rect) -> bool {
        let resized = rect.width != self.rect.width || rect.height != self.rect.height;
        self.rect = rect;
        if resized {
            log::debug!(
                "Panel {} resized to {}x{}",
                self.index,
                rect.width,
                rect.height
            );
            self.resolve();
        }
        resized
    }

    /// Scatter `count` resting balls uniformly over the interior
    pub fn generate_balls(&mut self, count: usize, spawner: &mut Spawner) {
        let extent = self.extent();
        if extent.x <= 0.0 || extent.y <= 0.0 {
            log::warn!(
                "Panel {} has degenerate bounds {:?}, balls will stack",
                self.index,
                extent
            );
        }

        self.balls
            .extend((0..count).map(|_| spawner.random_ball(extent)));
        log::info!("Panel {} generated {} balls", self.index, count);
        self.resolve();
    }

    /// Drop every ball and start over with the configured amount
    pub fn regenerate_balls(&mut self, spawner: &mut Spawner) {
        self.balls.clear();
        self.generate_balls(self.initial_balls, spawner);
    }

    /// Fresh start when nothing was restored. Replaces whatever the panel
    /// held before.
    pub fn generate_initial(&mut self, spawner: &mut Spawner) {
        self.balls.clear();
        if self.initial_balls > 0 {
            self.generate_balls(self.initial_balls, spawner);
        } else {
            self.resolve();
        }
    }

    /// Replace the balls with stored ones
    pub fn restore<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a BallRecord>,
        spawner: &mut Spawner,
    ) {
        self.balls = records
            .into_iter()
            .map(|r| spawner.restored_ball(r.position(), r.velocity(), r.color))
            .collect();
        log::info!("Panel {} restored {} balls", self.index, self.balls.len());
        self.resolve();
    }

    /// Persistable snapshot of every ball, tagged with this panel's index
    pub fn records(&self) -> impl Iterator<Item = BallRecord> + '_ {
        self.balls
            .iter()
            .map(move |b| BallRecord::from_ball(self.index, b))
    }

    /// Run the resolver; request a frame if anything is left moving
    pub fn resolve(&mut self) -> Resolution {
        let extent = self.extent();
        let result = collision::resolve(&mut self.balls, extent, self.physics.diameter);
        self.needs_resolve = false;
        if result.contacts > 0 {
            log::debug!("Panel {} resolved {} contacts", self.index, result.contacts);
        }
        if result.moving {
            self.schedule_frame();
        }
        result
    }

    /// Request one frame. Repeated requests before it runs collapse into one.
    pub fn schedule_frame(&mut self) {
        self.frame_pending = true;
    }

    /// The per-frame callback. Does nothing unless a frame was requested.
    /// Returns whether a frame ran.
    pub fn frame(&mut self) -> bool {
        if !self.frame_pending {
            return false;
        }
        self.frame_pending = false;

        let moved = motion::integrate(
            &mut self.balls,
            self.friction,
            self.physics.velocity_threshold,
        );
        if moved || self.needs_resolve {
            self.resolve();
        }
        true
    }

    /// Pick a ball up. Returns false if it is not in this panel.
    pub fn grab(&mut self, id: BallId, capture: DragCapture) -> bool {
        match self.balls.iter_mut().find(|b| b.id == id) {
            Some(ball) => {
                ball.grab(capture);
                true
            }
            None => false,
        }
    }

    /// A drag ended without a drop: the ball goes back where it was
    pub fn release(&mut self, id: BallId) -> bool {
        match self.balls.iter_mut().find(|b| b.id == id) {
            Some(ball) => {
                ball.release();
                true
            }
            None => false,
        }
    }

    /// Remove a ball from this panel, keeping the order of the rest
    pub fn take_ball(&mut self, id: BallId) -> Option<Ball> {
        let index = self.balls.iter().position(|b| b.id == id)?;
        Some(self.balls.remove(index))
    }

    /// Receive a thrown ball at a page-space pointer position
    pub fn accept_thrown(&mut self, mut ball: Ball, pointer: DVec2, vel: DVec2) {
        let origin = DVec2::new(self.rect.left, self.rect.top);
        ball.pos = pointer - origin - DVec2::splat(self.physics.radius());
        ball.vel = vel;
        self.balls.push(ball);
        self.needs_resolve = true;
        self.schedule_frame();
    }
}
