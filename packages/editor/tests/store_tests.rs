//! Store behavior across dispatch sequences

use blockpress_blocks::{Attributes, BlockInstance, BlockTypeDefinition, BlockTypeRegistry, ClientId};
use blockpress_editor::{Action, EditorSettings, EditorStore, Edits, Snapshot};
use serde_json::json;
use std::thread;

fn taxonomy_registry() -> BlockTypeRegistry {
    let mut registry = BlockTypeRegistry::new();
    registry
        .register(
            "list/taxonomy",
            BlockTypeDefinition::new("Taxonomy")
                .attribute_defaults(Attributes::from([
                    ("showCounts".to_string(), json!(false)),
                    ("asDropdown".to_string(), json!(false)),
                    ("showHierarchy".to_string(), json!(false)),
                ]))
                .save(|_| String::new()),
        )
        .unwrap();
    registry
}

fn taxonomy(id: &str) -> BlockInstance {
    BlockInstance::new(ClientId::new(id), "list/taxonomy", Attributes::new())
}

fn update(id: &str, key: &str, value: serde_json::Value) -> Action {
    Action::UpdateBlockAttributes {
        client_id: ClientId::new(id),
        attributes: Attributes::from([(key.to_string(), value)]),
    }
}

#[test]
fn test_undo_restores_attribute_and_dirty_flag() {
    let registry = taxonomy_registry();
    let store = EditorStore::new();
    store.dispatch(Action::ResetBlocks {
        blocks: vec![taxonomy("1"), taxonomy("2"), taxonomy("3")],
    });
    let dirty_before = store.is_dirty();

    store.dispatch(update("2", "showCounts", json!(true)));
    assert!(store.is_dirty());

    store.dispatch(Action::Undo);

    let block = store.block(&ClientId::new("2")).unwrap();
    assert_eq!(block.effective_attributes(&registry)["showCounts"], json!(false));
    assert_eq!(store.is_dirty(), dirty_before);
}

#[test]
fn test_undo_redo_inverse_law() {
    let store = EditorStore::new();
    store.dispatch(Action::ResetBlocks {
        blocks: vec![taxonomy("a"), taxonomy("b")],
    });

    let actions = vec![
        update("a", "showCounts", json!(true)),
        Action::InsertBlock {
            index: Some(0),
            block: taxonomy("c"),
        },
        Action::MoveBlock {
            client_id: ClientId::new("a"),
            to_index: 2,
        },
        Action::EditPost {
            edits: Edits::from([("title".to_string(), json!("Edited"))]),
        },
        Action::RemoveBlock {
            client_id: ClientId::new("b"),
        },
        update("c", "asDropdown", json!(true)),
    ];

    let mut after: Vec<Snapshot> = vec![store.snapshot()];
    for action in actions {
        store.dispatch(action);
        after.push(store.snapshot());
    }

    // Walk all the way back, then all the way forward
    for n in (1..after.len()).rev() {
        assert_eq!(store.snapshot(), after[n]);
        store.dispatch(Action::Undo);
        assert_eq!(store.snapshot(), after[n - 1]);
        store.dispatch(Action::Redo);
        assert_eq!(store.snapshot(), after[n]);
        store.dispatch(Action::Undo);
    }
    assert!(!store.can_undo());

    for snapshot in after.iter().skip(1) {
        store.dispatch(Action::Redo);
        assert_eq!(&store.snapshot(), snapshot);
    }
    assert!(!store.can_redo());
}

#[test]
fn test_history_is_bounded() {
    let store = EditorStore::new();
    store.dispatch(Action::SetupEditor {
        settings: EditorSettings::default().with_undo_capacity(3),
    });
    store.dispatch(Action::ResetBlocks {
        blocks: vec![taxonomy("a")],
    });

    let mut after = vec![store.snapshot()];
    for i in 0..5 {
        store.dispatch(update("a", "count", json!(i)));
        after.push(store.snapshot());
    }
    assert_eq!(store.state().history.undo_levels(), 3);

    for _ in 0..3 {
        store.undo();
    }
    assert_eq!(store.snapshot(), after[2]);

    // Oldest entries were dropped: further undo is a no-op
    let version = store.version();
    store.undo();
    assert_eq!(store.version(), version);
    assert_eq!(store.snapshot(), after[2]);
}

#[test]
fn test_empty_history_undo_redo_are_noops() {
    let store = EditorStore::new();
    let before = store.snapshot();
    store.undo();
    store.redo();
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.version(), 0);
}

#[test]
fn test_new_edit_after_undo_clears_redo() {
    let store = EditorStore::new();
    store.dispatch(Action::ResetBlocks {
        blocks: vec![taxonomy("a")],
    });
    store.dispatch(update("a", "showCounts", json!(true)));
    store.undo();
    assert!(store.can_redo());

    store.dispatch(update("a", "asDropdown", json!(true)));
    assert!(!store.can_redo());
}

#[test]
fn test_concurrent_dispatch_is_serialized() {
    let store = EditorStore::new();

    thread::scope(|scope| {
        for t in 0..8 {
            let store = store.clone();
            scope.spawn(move || {
                for i in 0..25 {
                    store.dispatch(Action::EditPost {
                        edits: Edits::from([(format!("t{t}"), json!(i))]),
                    });
                }
            });
        }
    });

    let snapshot = store.snapshot();
    assert_eq!(store.version(), 200);
    assert_eq!(snapshot.edits.len(), 8);
    // Per-thread dispatch order is preserved
    assert!(snapshot.edits.values().all(|v| v == &json!(24)));
}

#[test]
fn test_serialize_current_document() {
    let registry = taxonomy_registry();
    let store = EditorStore::new();
    store.dispatch(Action::ResetBlocks {
        blocks: vec![taxonomy("a"), taxonomy("b")],
    });
    store.dispatch(update("b", "showHierarchy", json!(true)));

    assert_eq!(
        store.serialize(&registry),
        "<!-- wp:list/taxonomy --><!-- /wp:list/taxonomy -->\n\n<!-- wp:list/taxonomy {\"showHierarchy\":true} --><!-- /wp:list/taxonomy -->"
    );
}
