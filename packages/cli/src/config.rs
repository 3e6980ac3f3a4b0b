use anyhow::{Context, Result};
use blockpress_blocks::BlockTypeRegistry;
use blockpress_editor::EditorSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "blockpress.config.json";

/// Blockpress configuration file format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Settings handed to the editor session
    #[serde(default)]
    pub editor: EditorSettings,

    /// Block library options
    #[serde(default)]
    pub blocks: BlocksConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlocksConfig {
    /// Register the built-in block library
    #[serde(default = "default_core")]
    pub core: bool,
}

fn default_core() -> bool {
    true
}

impl Default for BlocksConfig {
    fn default() -> Self {
        Self {
            core: default_core(),
        }
    }
}

impl Config {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(cwd: &Path) -> Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load an explicitly named config file; it must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn resolve(explicit: Option<&PathBuf>, cwd: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load(cwd),
        }
    }

    pub fn registry(&self) -> Result<BlockTypeRegistry> {
        if self.blocks.core {
            Ok(BlockTypeRegistry::with_core_blocks()?)
        } else {
            Ok(BlockTypeRegistry::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "editor": { "wideImages": true, "undoCapacity": 20 },
            "blocks": { "core": false }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.editor.wide_images);
        assert_eq!(config.editor.undo_capacity, 20);
        assert!(!config.blocks.core);
        assert!(config.registry().unwrap().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.blocks.core);
        assert_eq!(config.editor.undo_capacity, 100);
        assert_eq!(config.registry().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_config_file_yields_defaults() {
        let dir = std::env::temp_dir().join("blockpress-config-missing");
        assert_eq!(Config::load(&dir).unwrap(), Config::default());
        assert!(Config::load_from(&dir.join("nope.json")).is_err());
    }
}
