//! Patch document model.
//!
//! A patch is stored as JSON:
//!
//! ```json
//! {
//!   "modules": [
//!     { "id": "module-0", "type": "oscillator", "x": 120.0, "y": 80.0,
//!       "settings": { "frequency": 440.0, "waveform": "sine" } }
//!   ],
//!   "connections": [
//!     { "from": "module-0", "to": "module-1", "fromPort": 0, "toPort": 0 }
//!   ],
//!   "autoplay": false
//! }
//! ```
//!
//! Missing `settings`, coordinates and port indices default to empty and
//! zero, so hand-written patches can stay short.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::ConfigError;

/// One module entry of a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Identifier, preserved across save and load.
    pub id: String,
    /// Kind tag (`"oscillator"`, `"sequencer"`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Canvas x coordinate.
    #[serde(default)]
    pub x: f64,
    /// Canvas y coordinate.
    #[serde(default)]
    pub y: f64,
    /// Parameter values keyed by parameter name.
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl ModuleRecord {
    /// Creates a record with no settings.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            x,
            y,
            settings: Map::new(),
        }
    }

    /// Adds a setting.
    pub fn with_setting(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(name.into(), value.into());
        self
    }
}

/// One connection entry of a patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRecord {
    /// Source module id.
    pub from: String,
    /// Destination module id.
    pub to: String,
    /// Output port on the source.
    #[serde(default)]
    pub from_port: usize,
    /// Input port on the destination.
    #[serde(default)]
    pub to_port: usize,
}

impl ConnectionRecord {
    /// Creates a record.
    pub fn new(
        from: impl Into<String>,
        from_port: usize,
        to: impl Into<String>,
        to_port: usize,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            from_port,
            to_port,
        }
    }
}

/// A complete saved patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Modules in creation order.
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
    /// Connections in creation order.
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
    /// Start playback once the patch is loaded.
    #[serde(default)]
    pub autoplay: bool,
}

impl GraphDocument {
    /// Parse a document strictly: any malformed record fails the whole parse.
    ///
    /// Loading into a session goes through
    /// [`read_document`](crate::read_document) instead, which skips bad
    /// records.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a document strictly from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_json(&content)
    }

    /// Save to a file, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let mut content = self.to_json()?;
        content.push('\n');
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
    }
}
