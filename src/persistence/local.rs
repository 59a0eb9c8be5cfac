//! Browser LocalStorage
//!
//! Balls live under `balls` as a JSON string, the autosave flag under
//! `auto` as `"0"`/`"1"`.

use super::{BallRecord, Storage};
use crate::{Error, Result};

const BALLS_KEY: &str = "balls";
const AUTO_KEY: &str = "auto";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's LocalStorage
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .ok_or_else(|| Error::Storage("no window".into()))?
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| Error::Storage("LocalStorage is unavailable".into()))?;
        Ok(Self { storage })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }
}

fn js_error(e: wasm_bindgen::JsValue) -> Error {
    Error::Storage(format!("{e:?}"))
}

impl Storage for LocalStorage {
    fn save(&mut self, records: &[BallRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.set(BALLS_KEY, &json)?;
        log::info!("Saved {} balls", records.len());
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<BallRecord>>> {
        match self.get(BALLS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(None),
        }
    }

    fn set_autosave(&mut self, enabled: bool) -> Result<()> {
        self.set(AUTO_KEY, if enabled { "1" } else { "0" })
    }

    fn autosave(&self) -> Result<bool> {
        Ok(self.get(AUTO_KEY)?.is_some_and(|v| v.trim() == "1"))
    }

    fn clear(&mut self) -> Result<()> {
        self.storage.remove_item(BALLS_KEY).map_err(js_error)
    }
}
