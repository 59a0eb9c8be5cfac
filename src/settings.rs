//! Board configuration
//!
//! Loaded from a JSON file on native; defaults everywhere else.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::StorageKind;
use crate::sim::PhysicsParams;
use crate::{Error, Result};

/// Per-panel tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSettings {
    /// Velocity multiplier applied every tick, in (0, 1)
    pub friction: f64,
    /// Balls generated on a fresh start
    #[serde(default)]
    pub initial_balls: usize,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            friction: FRICTION_FACTOR,
            initial_balls: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Physics ===
    /// Shared disc diameter
    pub ball_diameter: f64,
    /// Per-axis speed below which a ball is considered at rest
    pub velocity_threshold: f64,
    /// Gesture velocity multiplier
    pub throw_scale: f64,

    // === Panels (attached in order) ===
    pub panels: Vec<PanelSettings>,

    // === Persistence ===
    /// Backend name: `memory`, `file` or `local`
    pub storage: String,
    /// Save location for the `file` backend
    pub storage_path: Option<PathBuf>,
    pub autosave_interval_ms: f64,

    /// Fixed RNG seed for reproducible layouts
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ball_diameter: BALL_DIAMETER,
            velocity_threshold: VELOCITY_THRESHOLD,
            throw_scale: THROW_SCALE,

            // A full panel to throw from and an empty, grippier one to throw into
            panels: vec![
                PanelSettings {
                    friction: FRICTION_FACTOR,
                    initial_balls: INITIAL_BALLS,
                },
                PanelSettings {
                    friction: 0.98,
                    initial_balls: 0,
                },
            ],

            storage: StorageKind::Memory.as_str().to_string(),
            storage_path: None,
            autosave_interval_ms: AUTOSAVE_INTERVAL_MS,

            seed: None,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file and validate them
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Resolve the storage backend name
    pub fn storage_kind(&self) -> Result<StorageKind> {
        self.storage.parse()
    }

    pub fn physics(&self) -> PhysicsParams {
        PhysicsParams {
            diameter: self.ball_diameter,
            velocity_threshold: self.velocity_threshold,
        }
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::Configuration(msg));

        if !(self.ball_diameter.is_finite() && self.ball_diameter > 0.0) {
            return invalid(format!("ball diameter must be positive, got {}", self.ball_diameter));
        }
        if !(self.velocity_threshold.is_finite() && self.velocity_threshold >= 0.0) {
            return invalid(format!(
                "velocity threshold must be non-negative, got {}",
                self.velocity_threshold
            ));
        }
        if !(self.throw_scale.is_finite() && self.throw_scale > 0.0) {
            return invalid(format!("throw scale must be positive, got {}", self.throw_scale));
        }
        if !(self.autosave_interval_ms.is_finite() && self.autosave_interval_ms > 0.0) {
            return invalid(format!(
                "autosave interval must be positive, got {}",
                self.autosave_interval_ms
            ));
        }
        if self.panels.is_empty() {
            return invalid("at least one panel is required".into());
        }
        for (i, panel) in self.panels.iter().enumerate() {
            // friction >= 1 would never let a ball come to rest
            if !(panel.friction > 0.0 && panel.friction < 1.0) {
                return invalid(format!(
                    "panel {i} friction must be in (0, 1), got {}",
                    panel.friction
                ));
            }
        }
        self.storage_kind()?;
        Ok(())
    }
}
