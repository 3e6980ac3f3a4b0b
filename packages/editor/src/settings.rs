use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_UNDO_CAPACITY: usize = 100;

/// Session configuration supplied through SETUP_EDITOR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorSettings {
    /// Enables wide and full alignments
    pub wide_images: bool,

    /// Maximum undo (and redo) entries kept; 0 keeps everything
    pub undo_capacity: usize,

    /// Collaborator flags passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            wide_images: false,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            extra: BTreeMap::new(),
        }
    }
}

impl EditorSettings {
    pub fn with_wide_images(mut self, enabled: bool) -> Self {
        self.wide_images = enabled;
        self
    }

    pub fn with_undo_capacity(mut self, capacity: usize) -> Self {
        self.undo_capacity = capacity;
        self
    }
}
