//! Session start: turns a bootstrapped post into a populated store.

use crate::actions::Action;
use crate::errors::EditorResult;
use crate::post::Post;
use crate::settings::EditorSettings;
use crate::state::Edits;
use crate::store::EditorStore;
use blockpress_blocks::{BlockTypeRegistry, IdGenerator, Parser};
use serde_json::Value;
use tracing::info;

/// Create a store for `post`, dispatching the standard setup sequence
pub fn create_editor_instance(
    registry: &BlockTypeRegistry,
    post: Post,
    settings: EditorSettings,
) -> EditorStore {
    let store = EditorStore::new();
    store.dispatch(Action::SetupEditor { settings });
    prepare_post_state(&store, registry, post);
    store
}

/// Same as [`create_editor_instance`] for JSON inputs; `settings` may be omitted
pub fn create_editor_instance_from_json(
    registry: &BlockTypeRegistry,
    post: Value,
    settings: Option<Value>,
) -> EditorResult<EditorStore> {
    let post: Post = serde_json::from_value(post)?;
    let settings = match settings {
        Some(settings) => serde_json::from_value(settings)?,
        None => EditorSettings::default(),
    };
    Ok(create_editor_instance(registry, post, settings))
}

fn prepare_post_state(store: &EditorStore, registry: &BlockTypeRegistry, post: Post) {
    let raw = post.content.raw.clone();
    let auto_draft_title = post.is_auto_draft().then(|| post.title.raw.clone());

    store.dispatch(Action::ResetPost { post });

    if !raw.is_empty() {
        let blocks = Parser::with_ids(registry, IdGenerator::new(&raw)).parse(&raw);
        info!(blocks = blocks.len(), "Loaded post content");
        store.dispatch(Action::ResetBlocks { blocks });
    }

    // Auto-draft title goes into edits without flagging the post dirty
    if let Some(title) = auto_draft_title {
        store.dispatch(Action::SetupNewPost {
            edits: Edits::from([("title".to_string(), Value::String(title))]),
        });
    }
}
