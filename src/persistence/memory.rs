//! Process-local storage

use super::{BallRecord, Storage};
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    balls: Option<Vec<BallRecord>>,
    auto: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&mut self, records: &[BallRecord]) -> Result<()> {
        self.balls = Some(records.to_vec());
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<BallRecord>>> {
        Ok(self.balls.clone())
    }

    fn set_autosave(&mut self, enabled: bool) -> Result<()> {
        self.auto = enabled;
        Ok(())
    }

    fn autosave(&self) -> Result<bool> {
        Ok(self.auto)
    }

    fn clear(&mut self) -> Result<()> {
        self.balls = None;
        Ok(())
    }
}
