use crate::persistence::DEFAULT_STORAGE_KEY;
use crate::EditorError;
use serde::{Deserialize, Serialize};

/// Editor session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorOptions {
    /// Write blocks through to persistence after every change
    #[serde(default = "default_autosave")]
    pub autosave: bool,

    /// Undo depth; 0 keeps every step
    #[serde(default = "default_max_history_size")]
    pub max_history_size: usize,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_autosave() -> bool {
    true
}

fn default_max_history_size() -> usize {
    100
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            autosave: default_autosave(),
            max_history_size: default_max_history_size(),
            storage_key: default_storage_key(),
        }
    }
}

impl EditorOptions {
    /// Parse options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn with_max_history_size(mut self, max_history_size: usize) -> Self {
        self.max_history_size = max_history_size;
        self
    }

    pub fn with_storage_key(mut self, storage_key: impl Into<String>) -> Self {
        self.storage_key = storage_key.into();
        self
    }
}
