//! JSON document on disk
//!
//! Writes go to a sibling `.tmp` file which is then renamed over the save,
//! so a crash mid-write never leaves a truncated document behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{BallRecord, Storage};
use crate::Result;

/// On-disk layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SaveFile {
    #[serde(default)]
    balls: Option<Vec<BallRecord>>,
    #[serde(default)]
    auto: bool,
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<SaveFile> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SaveFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, file: &SaveFile) -> Result<()> {
        let json = serde_json::to_string_pretty(file)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut SaveFile)) -> Result<()> {
        let mut file = self.read()?;
        change(&mut file);
        self.write(&file)
    }
}

impl Storage for FileStorage {
    fn save(&mut self, records: &[BallRecord]) -> Result<()> {
        self.update(|f| f.balls = Some(records.to_vec()))?;
        log::info!("Saved {} balls to {}", records.len(), self.path.display());
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<BallRecord>>> {
        Ok(self.read()?.balls)
    }

    fn set_autosave(&mut self, enabled: bool) -> Result<()> {
        self.update(|f| f.auto = enabled)
    }

    fn autosave(&self) -> Result<bool> {
        Ok(self.read()?.auto)
    }

    fn clear(&mut self) -> Result<()> {
        self.update(|f| f.balls = None)?;
        log::info!("Cleared saved balls in {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::sim::Rgb;

    fn records() -> Vec<BallRecord> {
        vec![
            BallRecord::new(0, 12.5, 40.0, -1.25, 0.0, Rgb([255, 1, 128])),
            BallRecord::new(1, 0.0, 3.0, 0.0, 7.5, Rgb([9, 8, 7])),
        ]
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("save.json"));
        assert!(storage.load().unwrap().is_none());
        assert!(!storage.autosave().unwrap());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("save.json"));
        storage.save(&records()).unwrap();

        let reopened = FileStorage::new(dir.path().join("save.json"));
        assert_eq!(reopened.load().unwrap(), Some(records()));
        assert!(!dir.path().join("save.tmp").exists());
    }

    #[test]
    fn test_record_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        let mut storage = FileStorage::new(&path);
        storage.save(&records()[..1]).unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let first = &doc["balls"][0];
        assert_eq!(first["panel"], 0);
        assert_eq!(first["x"], 12.5);
        assert_eq!(first["u"], -1.25);
        assert_eq!(first["color"], serde_json::json!([255, 1, 128]));
    }

    #[test]
    fn test_autosave_and_clear_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("save.json"));
        storage.save(&records()).unwrap();
        storage.set_autosave(true).unwrap();
        assert_eq!(storage.load().unwrap().map(|r| r.len()), Some(2));

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
        assert!(storage.autosave().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, "{ not json").unwrap();
        let storage = FileStorage::new(&path);
        assert!(matches!(storage.load(), Err(Error::Serialization(_))));
    }
}
