//! # Editor Actions
//!
//! Every state change goes through one of these records. They serialize as
//! `{"type": "UPDATE_BLOCK_ATTRIBUTES", "clientId": ..., "attributes": {...}}`
//! so collaborators can dispatch plain JSON.

use crate::errors::ActionError;
use crate::post::Post;
use crate::settings::EditorSettings;
use crate::state::Edits;
use blockpress_blocks::{Attributes, BlockInstance, ClientId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Replace post metadata and mark the post clean
    ResetPost { post: Post },

    /// Replace the whole document; history starts over
    ResetBlocks { blocks: Vec<BlockInstance> },

    SetupEditor { settings: EditorSettings },

    /// Seed edits for a fresh draft without marking it dirty
    SetupNewPost { edits: Edits },

    EditPost { edits: Edits },

    /// Merge a partial attribute map into one instance
    #[serde(rename_all = "camelCase")]
    UpdateBlockAttributes {
        client_id: ClientId,
        attributes: Attributes,
    },

    /// Insert at `index`, or append when absent
    #[serde(rename_all = "camelCase")]
    InsertBlock {
        #[serde(default)]
        index: Option<usize>,
        block: BlockInstance,
    },

    #[serde(rename_all = "camelCase")]
    RemoveBlock { client_id: ClientId },

    #[serde(rename_all = "camelCase")]
    MoveBlock { client_id: ClientId, to_index: usize },

    Undo,
    Redo,
}

/// Wire names of every recognized action
pub const ACTION_TYPES: [&str; 11] = [
    "RESET_POST",
    "RESET_BLOCKS",
    "SETUP_EDITOR",
    "SETUP_NEW_POST",
    "EDIT_POST",
    "UPDATE_BLOCK_ATTRIBUTES",
    "INSERT_BLOCK",
    "REMOVE_BLOCK",
    "MOVE_BLOCK",
    "UNDO",
    "REDO",
];

impl Action {
    /// Decode a JSON action record.
    ///
    /// Returns `Ok(None)` for a record whose type is not recognized; such
    /// records are reported and otherwise ignored.
    pub fn from_record(record: Value) -> Result<Option<Self>, ActionError> {
        let kind = record
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ActionError::MissingType)?
            .to_string();

        if !ACTION_TYPES.contains(&kind.as_str()) {
            warn!(action = %kind, "Ignoring unrecognized action type");
            return Ok(None);
        }

        serde_json::from_value(record)
            .map(Some)
            .map_err(|e| ActionError::Payload {
                action: kind,
                message: e.to_string(),
            })
    }

    /// Wire name, as it appears in the `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            Action::ResetPost { .. } => "RESET_POST",
            Action::ResetBlocks { .. } => "RESET_BLOCKS",
            Action::SetupEditor { .. } => "SETUP_EDITOR",
            Action::SetupNewPost { .. } => "SETUP_NEW_POST",
            Action::EditPost { .. } => "EDIT_POST",
            Action::UpdateBlockAttributes { .. } => "UPDATE_BLOCK_ATTRIBUTES",
            Action::InsertBlock { .. } => "INSERT_BLOCK",
            Action::RemoveBlock { .. } => "REMOVE_BLOCK",
            Action::MoveBlock { .. } => "MOVE_BLOCK",
            Action::Undo => "UNDO",
            Action::Redo => "REDO",
        }
    }

    /// Whether applying this action records an undo entry
    pub fn records_history(&self) -> bool {
        matches!(
            self,
            Action::EditPost { .. }
                | Action::UpdateBlockAttributes { .. }
                | Action::InsertBlock { .. }
                | Action::RemoveBlock { .. }
                | Action::MoveBlock { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_update_record() {
        let action = Action::from_record(json!({
            "type": "UPDATE_BLOCK_ATTRIBUTES",
            "clientId": "abc-1",
            "attributes": {"showPostCounts": true}
        }))
        .unwrap()
        .unwrap();

        assert_eq!(
            action,
            Action::UpdateBlockAttributes {
                client_id: ClientId::new("abc-1"),
                attributes: Attributes::from([("showPostCounts".to_string(), json!(true))]),
            }
        );
        assert!(action.records_history());
    }

    #[test]
    fn test_decode_unit_actions() {
        assert_eq!(
            Action::from_record(json!({"type": "UNDO"})).unwrap(),
            Some(Action::Undo)
        );
        assert_eq!(
            Action::from_record(json!({"type": "REDO"})).unwrap(),
            Some(Action::Redo)
        );
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        assert_eq!(
            Action::from_record(json!({"type": "TOGGLE_SIDEBAR"})).unwrap(),
            None
        );
    }

    #[test]
    fn test_bad_records_are_errors() {
        assert_eq!(
            Action::from_record(json!({"clientId": "x"})),
            Err(ActionError::MissingType)
        );
        assert!(matches!(
            Action::from_record(json!({"type": "REMOVE_BLOCK"})),
            Err(ActionError::Payload { action, .. }) if action == "REMOVE_BLOCK"
        ));
    }

    #[test]
    fn test_kind_matches_wire_name() {
        let actions = [
            Action::Undo,
            Action::EditPost {
                edits: Edits::new(),
            },
            Action::MoveBlock {
                client_id: ClientId::new("a"),
                to_index: 0,
            },
        ];

        for action in actions {
            let record = serde_json::to_value(&action).unwrap();
            assert_eq!(record["type"], json!(action.kind()));
            assert!(ACTION_TYPES.contains(&action.kind()));
        }
    }
}
