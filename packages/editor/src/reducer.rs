//! Pure state transitions for dispatched actions.
//!
//! `reduce` is only ever called by the store's single writer. It returns
//! whether the state changed so the store can version and notify.

use crate::actions::Action;
use crate::state::{EditorState, Snapshot};
use blockpress_blocks::{BlockInstance, ClientId};
use std::sync::Arc;
use tracing::{debug, warn};

pub fn reduce(state: &mut EditorState, action: Action) -> bool {
    match action {
        Action::ResetPost { post } => {
            state.present.post = post;
            state.present.dirty = false;
            true
        }
        Action::ResetBlocks { blocks } => {
            state.present.blocks = Arc::new(blocks);
            state.history.clear();
            true
        }
        Action::SetupEditor { settings } => {
            state.history.set_capacity(settings.undo_capacity);
            state.settings = settings;
            true
        }
        Action::SetupNewPost { edits } => {
            state.present.edits.extend(edits);
            true
        }
        Action::EditPost { edits } => {
            record(state);
            state.present.edits.extend(edits);
            state.present.dirty = true;
            true
        }
        Action::UpdateBlockAttributes {
            client_id,
            attributes,
        } => {
            let Some(index) = find(&state.present, &client_id, "UPDATE_BLOCK_ATTRIBUTES") else {
                return false;
            };
            // Raw blocks serialize verbatim; attributes on them would never be written
            if state.present.blocks[index].is_opaque() {
                warn!(client_id = %client_id, "Ignoring attribute update on a raw block");
                return false;
            }
            record(state);
            let blocks = Arc::make_mut(&mut state.present.blocks);
            blocks[index].attributes.extend(attributes);
            state.present.dirty = true;
            true
        }
        Action::InsertBlock { index, block } => insert_block(state, index, block),
        Action::RemoveBlock { client_id } => {
            let Some(index) = find(&state.present, &client_id, "REMOVE_BLOCK") else {
                return false;
            };
            record(state);
            Arc::make_mut(&mut state.present.blocks).remove(index);
            state.present.dirty = true;
            true
        }
        Action::MoveBlock {
            client_id,
            to_index,
        } => move_block(state, &client_id, to_index),
        Action::Undo => match state.history.undo(state.present.clone()) {
            Some(previous) => {
                state.present = previous;
                true
            }
            None => {
                debug!("Nothing to undo");
                false
            }
        },
        Action::Redo => match state.history.redo(state.present.clone()) {
            Some(next) => {
                state.present = next;
                true
            }
            None => {
                debug!("Nothing to redo");
                false
            }
        },
    }
}

fn record(state: &mut EditorState) {
    state.history.record(state.present.clone());
}

fn find(snapshot: &Snapshot, client_id: &ClientId, action: &str) -> Option<usize> {
    let index = snapshot.position(client_id);
    if index.is_none() {
        warn!(action, client_id = %client_id, "Action targets a block that does not exist");
    }
    index
}

fn insert_block(state: &mut EditorState, index: Option<usize>, block: BlockInstance) -> bool {
    if state.present.position(&block.client_id).is_some() {
        warn!(client_id = %block.client_id, "Ignoring insert of a block id already in the document");
        return false;
    }

    let len = state.present.blocks.len();
    let index = index.map_or(len, |index| index.min(len));

    record(state);
    Arc::make_mut(&mut state.present.blocks).insert(index, block);
    state.present.dirty = true;
    true
}

fn move_block(state: &mut EditorState, client_id: &ClientId, to_index: usize) -> bool {
    let Some(from) = find(&state.present, client_id, "MOVE_BLOCK") else {
        return false;
    };
    let to = to_index.min(state.present.blocks.len() - 1);
    if from == to {
        return false;
    }

    record(state);
    let blocks = Arc::make_mut(&mut state.present.blocks);
    let block = blocks.remove(from);
    blocks.insert(to, block);
    state.present.dirty = true;
    true
}
