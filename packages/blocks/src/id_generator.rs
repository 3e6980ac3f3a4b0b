use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter so ids never collide between generators or parses
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Session-local identifier of a block instance. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Derive a short session seed from a label using CRC32
pub fn session_seed(label: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(label.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential client id generator for one editing session
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
}

impl IdGenerator {
    pub fn new(label: &str) -> Self {
        Self {
            seed: session_seed(label),
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed }
    }

    /// Generate next sequential ID
    pub fn new_id(&self) -> ClientId {
        let count = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
        ClientId(format!("{}-{}", self.seed, count))
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("blockpress")
    }
}
