//! The set of attached panels and their shared storage
//!
//! Panels are attached in order; a panel's position is the tag its balls
//! carry in saved data. The storage backend is handed in at construction
//! and every save, load and clear goes through it.

use glam::DVec2;

use super::ball::{BallId, DragCapture};
use super::interaction::{Gesture, throw_velocity};
use super::panel::{Panel, PhysicsParams, Rect};
use super::spawner::Spawner;
use crate::persistence::{BallRecord, Storage};
use crate::settings::{PanelSettings, Settings};
use crate::{Error, Result};

/// Periodic save timer
#[derive(Debug, Clone, Copy, PartialEq)]
struct Autosave {
    enabled: bool,
    interval_ms: f64,
    last_save_ms: Option<f64>,
}

pub struct Board<S: Storage> {
    panels: Vec<Panel>,
    storage: S,
    spawner: Spawner,
    physics: PhysicsParams,
    throw_scale: f64,
    autosave: Autosave,
}

impl<S: Storage> Board<S> {
    /// Attach one panel per entry in `settings.panels`
    pub fn new(settings: &Settings, storage: S, seed: u64) -> Result<Self> {
        settings.validate()?;

        let enabled = storage.autosave()?;
        let mut board = Self {
            panels: Vec::with_capacity(settings.panels.len()),
            storage,
            spawner: Spawner::new(seed),
            physics: settings.physics(),
            throw_scale: settings.throw_scale,
            autosave: Autosave {
                enabled,
                interval_ms: settings.autosave_interval_ms,
                last_save_ms: None,
            },
        };
        for panel in &settings.panels {
            board.attach_panel(panel);
        }
        log::info!(
            "Board ready with {} panels (seed {}, autosave {})",
            board.panels.len(),
            seed,
            if enabled { "on" } else { "off" }
        );
        Ok(board)
    }

    /// Attach another panel, returning its index
    pub fn attach_panel(&mut self, settings: &PanelSettings) -> usize {
        let index = self.panels.len();
        self.panels.push(Panel::new(index, settings, self.physics));
        index
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, index: usize) -> Result<&Panel> {
        self.panels.get(index).ok_or(Error::PanelNotAttached(index))
    }

    fn panel_mut(&mut self, index: usize) -> Result<&mut Panel> {
        self.panel_with_spawner(index).map(|(panel, _)| panel)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn physics(&self) -> PhysicsParams {
        self.physics
    }

    /// Index of the panel currently owning `id`
    pub fn owner_of(&self, id: BallId) -> Option<usize> {
        self.panels.iter().position(|p| p.contains(id))
    }

    /// Total ball count across panels
    pub fn ball_count(&self) -> usize {
        self.panels.iter().map(|p| p.balls().len()).sum()
    }

    /// New container geometry for one panel
    pub fn resize(&mut self, index: usize, rect: Rect) -> Result<bool> {
        Ok(self.panel_mut(index)?.resize(rect))
    }

    /// Add `count` random balls to one panel
    pub fn generate(&mut self, index: usize, count: usize) -> Result<()> {
        let (panel, spawner) = self.panel_with_spawner(index)?;
        panel.generate_balls(count, spawner);
        Ok(())
    }

    fn panel_with_spawner(&mut self, index: usize) -> Result<(&mut Panel, &mut Spawner)> {
        let panel = self
            .panels
            .get_mut(index)
            .ok_or(Error::PanelNotAttached(index))?;
        Ok((panel, &mut self.spawner))
    }

    /// Stored balls that belong to one panel; `None` when nothing applies
    pub fn panel_data(&self, index: usize) -> Result<Option<Vec<BallRecord>>> {
        self.panel(index)?;
        Ok(self.saved_records()?.and_then(|records| {
            let mine: Vec<BallRecord> = records.into_iter().filter(|r| r.panel == index).collect();
            (!mine.is_empty()).then_some(mine)
        }))
    }

    /// Load every panel from storage. Panels without stored balls start
    /// fresh.
    pub fn restore(&mut self) -> Result<()> {
        let records = self.saved_records()?.unwrap_or_default();
        for panel in &mut self.panels {
            let index = panel.index();
            let mut mine = records.iter().filter(|r| r.panel == index).peekable();
            if mine.peek().is_some() {
                panel.restore(mine, &mut self.spawner);
            } else {
                panel.generate_initial(&mut self.spawner);
            }
        }

        let stray = records.iter().filter(|r| r.panel >= self.panels.len()).count();
        if stray > 0 {
            log::warn!("Ignored {stray} saved balls for panels that are not attached");
        }
        Ok(())
    }

    /// An empty save counts as no save
    fn saved_records(&self) -> Result<Option<Vec<BallRecord>>> {
        Ok(self.storage.load()?.filter(|r| !r.is_empty()))
    }

    /// Run one animation frame on every panel that asked for one.
    /// Returns how many panels ran.
    pub fn frame(&mut self) -> usize {
        self.panels.iter_mut().map(|p| p.frame()).filter(|&ran| ran).count()
    }

    /// No panel is waiting for a frame
    pub fn is_quiescent(&self) -> bool {
        self.panels.iter().all(|p| !p.frame_pending())
    }

    /// Drive frames until everything rests or `max_frames` is reached.
    /// Returns the number of frames run.
    pub fn run_until_quiescent(&mut self, max_frames: usize) -> usize {
        let mut frames = 0;
        while !self.is_quiescent() && frames < max_frames {
            self.frame();
            frames += 1;
        }
        if !self.is_quiescent() {
            log::warn!("Still moving after {frames} frames");
        }
        frames
    }

    /// Feed one gesture from the host
    pub fn handle(&mut self, gesture: Gesture) -> Result<()> {
        match gesture {
            Gesture::Start { ball, pointer, time } => {
                self.begin_drag(ball, pointer, time);
            }
            Gesture::Drop {
                ball,
                target,
                pointer,
                time,
            } => {
                self.drop_ball(ball, target, pointer, time)?;
            }
            Gesture::Cancel { ball } => {
                self.cancel_drag(ball);
            }
        }
        Ok(())
    }

    /// Pick a ball up. Returns false if no panel owns it.
    pub fn begin_drag(&mut self, id: BallId, pointer: DVec2, time: f64) -> bool {
        let capture = DragCapture { pointer, time };
        let found = self.panels.iter_mut().any(|p| p.grab(id, capture));
        if found {
            log::debug!("Picked up {id}");
        }
        found
    }

    /// Put a held ball back where it was lifted from
    pub fn cancel_drag(&mut self, id: BallId) -> bool {
        self.panels.iter_mut().any(|p| p.release(id))
    }

    /// Throw a held ball into `target`.
    ///
    /// The ball leaves its current panel and joins the target in one step.
    /// Returns the throw velocity, or `None` when the ball no longer exists
    /// or was never picked up.
    pub fn drop_ball(
        &mut self,
        id: BallId,
        target: usize,
        pointer: DVec2,
        time: f64,
    ) -> Result<Option<DVec2>> {
        self.panel(target)?;

        let Some(source) = self.owner_of(id) else {
            log::debug!("Drop for {id} ignored, ball is gone");
            return Ok(None);
        };
        let held = self.panels[source].ball(id).is_some_and(|b| b.is_held());
        if !held {
            log::warn!("Drop for {id} ignored, it was never picked up");
            return Ok(None);
        }

        let Some(mut ball) = self.panels[source].take_ball(id) else {
            return Ok(None);
        };
        let vel = match ball.take_capture() {
            Some(capture) => throw_velocity(capture, pointer, time, self.throw_scale),
            None => DVec2::ZERO,
        };
        self.panels[target].accept_thrown(ball, pointer, vel);

        log::info!("Threw {id} from panel {source} into panel {target} at {vel:?}");
        Ok(Some(vel))
    }

    /// Every ball across all panels, flattened in panel order
    pub fn records(&self) -> Vec<BallRecord> {
        self.panels.iter().flat_map(|p| p.records()).collect()
    }

    /// Snapshot current state to storage
    pub fn save(&mut self) -> Result<()> {
        let records = self.records();
        self.storage.save(&records)?;
        log::debug!("Saved {} balls", records.len());
        Ok(())
    }

    /// Wipe storage and regenerate every panel
    pub fn new_game(&mut self) -> Result<()> {
        self.storage.clear()?;
        for panel in &mut self.panels {
            panel.regenerate_balls(&mut self.spawner);
        }
        log::info!("New game");
        Ok(())
    }

    pub fn clear_storage(&mut self) -> Result<()> {
        self.storage.clear()
    }

    pub fn autosave_enabled(&self) -> bool {
        self.autosave.enabled
    }

    /// Turn autosave on or off and persist the choice
    pub fn set_autosave(&mut self, enabled: bool) -> Result<()> {
        self.storage.set_autosave(enabled)?;
        self.autosave.enabled = enabled;
        self.autosave.last_save_ms = None;
        log::info!("Autosave {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Tell the board the current time. Saves when autosave is on and an
    /// interval has passed since the last autosave. Returns whether it saved.
    pub fn advance_clock(&mut self, now_ms: f64) -> Result<bool> {
        if !self.autosave.enabled {
            return Ok(false);
        }
        match self.autosave.last_save_ms {
            None => {
                // interval starts counting when autosave is first observed
                self.autosave.last_save_ms = Some(now_ms);
                Ok(false)
            }
            Some(last) if now_ms - last >= self.autosave.interval_ms => {
                self.autosave.last_save_ms = Some(now_ms);
                self.save()?;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }
}
