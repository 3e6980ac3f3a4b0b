use crate::post::Post;
use crate::settings::EditorSettings;
use crate::undo_stack::UndoStack;
use blockpress_blocks::{BlockInstance, ClientId};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The document body. Shared between snapshots and copied on write.
pub type BlockTree = Arc<Vec<BlockInstance>>;

/// Uncommitted top-level post fields
pub type Edits = BTreeMap<String, Value>;

/// Everything undo can restore
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub post: Post,
    pub blocks: BlockTree,
    pub edits: Edits,
    pub dirty: bool,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            post: Post::default(),
            blocks: Arc::new(Vec::new()),
            edits: Edits::new(),
            dirty: false,
        }
    }
}

impl Snapshot {
    pub fn block(&self, client_id: &ClientId) -> Option<&BlockInstance> {
        self.blocks.iter().find(|block| &block.client_id == client_id)
    }

    pub fn position(&self, client_id: &ClientId) -> Option<usize> {
        self.blocks.iter().position(|block| &block.client_id == client_id)
    }

    /// Title with any uncommitted edit applied
    pub fn edited_title(&self) -> &str {
        self.edits
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(&self.post.title.raw)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub present: Snapshot,
    pub settings: EditorSettings,
    pub history: UndoStack<Snapshot>,
}

impl Default for EditorState {
    fn default() -> Self {
        let settings = EditorSettings::default();
        Self {
            present: Snapshot::default(),
            history: UndoStack::with_capacity(settings.undo_capacity),
            settings,
        }
    }
}
