//! Error types
//!
//! Simulation operations are total; only configuration, storage and panel
//! attachment can fail.

use thiserror::Error;

/// Everything that can go wrong outside the simulation loop
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("panel {0} is not attached to this board")]
    PanelNotAttached(usize),

    #[error("storage backend failure: {0}")]
    Storage(String),

    #[error("storage I/O failed")]
    Io(#[from] std::io::Error),

    #[error("malformed save data")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
