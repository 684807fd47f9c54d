// src/services/preferences.rs
// DOCUMENTATION: Persisted user preferences
// PURPOSE: Session token lookup and the construction-sites push flag

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::errors::PreferenceError;
use crate::models::lenient::value_as_bool;

/// Key of the backend session token
pub const SESSION_TOKEN_KEY: &str = "SessionToken";

/// Key of the construction-sites push flag
pub const CONSTRUCTION_SITES_PUSH_KEY: &str = "OSCAMap_Construction_Sites_Push";

/// String-keyed preference store
pub trait PreferenceStore: Send + Sync {
    fn string(&self, key: &str) -> Option<String>;

    /// Stored flag, `false` when missing
    fn bool(&self, key: &str) -> bool;

    fn set_string(&self, key: &str, value: &str) -> Result<(), PreferenceError>;

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PreferenceError>;
}

type Values = RwLock<BTreeMap<String, Value>>;

fn read_string(values: &Values, key: &str) -> Option<String> {
    let values = values.read().unwrap_or_else(|poisoned| poisoned.into_inner());
    match values.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn read_bool(values: &Values, key: &str) -> bool {
    let values = values.read().unwrap_or_else(|poisoned| poisoned.into_inner());
    values.get(key).map_or(false, value_as_bool)
}

fn write_value(values: &Values, key: &str, value: Value) -> BTreeMap<String, Value> {
    let mut values = values.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    values.insert(key.to_string(), value);
    values.clone()
}

/// Process-local preferences
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Values,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn string(&self, key: &str) -> Option<String> {
        read_string(&self.values, key)
    }

    fn bool(&self, key: &str) -> bool {
        read_bool(&self.values, key)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        write_value(&self.values, key, Value::from(value));
        Ok(())
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PreferenceError> {
        write_value(&self.values, key, Value::from(value));
        Ok(())
    }
}

/// Preferences persisted as a flat JSON object
/// DOCUMENTATION: The file is read once on open and rewritten on every change
#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    values: Values,
}

impl JsonFilePreferences {
    /// Open the store at `path`; a missing file starts out empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PreferenceError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Preference file {} not found, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, key: &str, value: Value) -> Result<(), PreferenceError> {
        let snapshot = write_value(&self.values, key, value);
        let json = serde_json::to_vec_pretty(&snapshot)?;
        std::fs::write(&self.path, json).map_err(|e| {
            log::error!("Cannot write preference file {}: {}", self.path.display(), e);
            PreferenceError::from(e)
        })
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn string(&self, key: &str) -> Option<String> {
        read_string(&self.values, key)
    }

    fn bool(&self, key: &str) -> bool {
        read_bool(&self.values, key)
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.persist(key, Value::from(value))
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PreferenceError> {
        self.persist(key, Value::from(value))
    }
}
