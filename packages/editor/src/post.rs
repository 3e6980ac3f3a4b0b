use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Status of a draft created by the host but never saved
pub const AUTO_DRAFT: &str = "auto-draft";

/// A field delivered in its raw (unrendered) form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    #[serde(default)]
    pub raw: String,
}

impl RawField {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

/// Post entity handed over by the host at session start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub content: RawField,

    #[serde(default)]
    pub title: RawField,

    #[serde(default = "default_status")]
    pub status: String,

    /// Remaining entity fields (id, type, link...) are carried opaquely
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_status() -> String {
    "draft".to_string()
}

impl Default for Post {
    fn default() -> Self {
        Self {
            content: RawField::default(),
            title: RawField::default(),
            status: default_status(),
            extra: BTreeMap::new(),
        }
    }
}

impl Post {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: RawField::new(content),
            title: RawField::new(title),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn is_auto_draft(&self) -> bool {
        self.status == AUTO_DRAFT
    }
}
