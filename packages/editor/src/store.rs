//! # Editor Store
//!
//! Single-writer container for the editor state.
//!
//! `dispatch` may be called from any thread and from inside listeners.
//! Actions go through one FIFO queue; whichever caller finds the store idle
//! becomes the writer and drains the queue, applying actions one at a time.
//! Any other caller (including a listener reacting to the action in flight)
//! only enqueues, so actions never apply concurrently or reentrantly.
//! A listener that panics is reported and skipped; the writer keeps draining.

use crate::actions::Action;
use crate::errors::EditorResult;
use crate::reducer;
use crate::settings::EditorSettings;
use crate::state::{BlockTree, EditorState, Snapshot};
use blockpress_blocks::{serialize, BlockInstance, BlockTypeRegistry, ClientId};
use serde_json::Value;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument, warn};

/// Called after every applied action with the resulting document
pub type Listener = Arc<dyn Fn(&Action, &Snapshot) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct StoreInner {
    state: EditorState,
    queue: VecDeque<Action>,
    applying: bool,
    version: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

/// Cloneable handle; clones share one store
#[derive(Clone)]
pub struct EditorStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl EditorStore {
    pub fn new() -> Self {
        Self::with_state(EditorState::default())
    }

    pub fn with_state(state: EditorState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                state,
                queue: VecDeque::new(),
                applying: false,
                version: 0,
                listeners: Vec::new(),
                next_subscription: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // Actions are applied whole before the guard drops, so a poisoned
        // guard still holds a consistent state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[instrument(skip_all, fields(action = action.kind()))]
    pub fn dispatch(&self, action: Action) {
        let mut inner = self.lock();
        inner.queue.push_back(action);
        if inner.applying {
            debug!(queued = inner.queue.len(), "Queued behind action in flight");
            return;
        }
        inner.applying = true;

        loop {
            let Some(action) = inner.queue.pop_front() else {
                break;
            };
            let changed = reducer::reduce(&mut inner.state, action.clone());
            if changed {
                inner.version += 1;
            }

            let listeners: Vec<Listener> = inner
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            let snapshot = inner.state.present.clone();
            drop(inner);

            for listener in &listeners {
                let notified =
                    panic::catch_unwind(AssertUnwindSafe(|| listener(&action, &snapshot)));
                if notified.is_err() {
                    warn!(action = action.kind(), "Store listener panicked");
                }
            }

            inner = self.lock();
        }

        inner.applying = false;
    }

    /// Decode and dispatch a JSON action record. Unrecognized types are a no-op.
    pub fn dispatch_record(&self, record: Value) -> EditorResult<()> {
        if let Some(action) = Action::from_record(record)? {
            self.dispatch(action);
        }
        Ok(())
    }

    pub fn undo(&self) {
        self.dispatch(Action::Undo);
    }

    pub fn redo(&self) {
        self.dispatch(Action::Redo);
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Action, &Snapshot) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(subscription, _)| *subscription != id);
        inner.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn state(&self) -> EditorState {
        self.lock().state.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().state.present.clone()
    }

    pub fn blocks(&self) -> BlockTree {
        Arc::clone(&self.lock().state.present.blocks)
    }

    pub fn block(&self, client_id: &ClientId) -> Option<BlockInstance> {
        self.lock().state.present.block(client_id).cloned()
    }

    pub fn settings(&self) -> EditorSettings {
        self.lock().state.settings.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().state.present.dirty
    }

    pub fn can_undo(&self) -> bool {
        self.lock().state.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.lock().state.history.can_redo()
    }

    /// Number of applied actions that changed the state
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    /// Current document as portable markup
    pub fn serialize(&self, registry: &BlockTypeRegistry) -> String {
        let blocks = self.blocks();
        serialize(&blocks, registry)
    }
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Edits;
    use blockpress_blocks::Attributes;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn edit(key: &str, value: Value) -> Action {
        Action::EditPost {
            edits: Edits::from([(key.to_string(), value)]),
        }
    }

    #[test]
    fn test_version_counts_state_changes() {
        let store = EditorStore::new();
        store.dispatch(edit("title", json!("a")));
        store.undo();
        store.undo();

        // Second undo had nothing to do
        assert_eq!(store.version(), 2);
        assert!(!store.can_undo());
        assert!(store.can_redo());
    }

    #[test]
    fn test_listener_sees_every_action() {
        let store = EditorStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |action, _| sink.lock().unwrap().push(action.kind()));

        store.dispatch(edit("title", json!("a")));
        store.undo();

        assert_eq!(*seen.lock().unwrap(), vec!["EDIT_POST", "UNDO"]);
    }

    #[test]
    fn test_listener_dispatch_is_queued_not_reentrant() {
        let store = EditorStore::new();
        let depth = Arc::new(AtomicUsize::new(0));
        let max_depth = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(Mutex::new(Vec::new()));

        let handle = store.clone();
        let (d, m, o) = (Arc::clone(&depth), Arc::clone(&max_depth), Arc::clone(&order));
        store.subscribe(move |action, snapshot| {
            let now = d.fetch_add(1, Ordering::SeqCst) + 1;
            m.fetch_max(now, Ordering::SeqCst);
            o.lock().unwrap().push(snapshot.edited_title().to_string());

            if matches!(action, Action::EditPost { .. }) && snapshot.edited_title() == "first" {
                handle.dispatch(edit("title", json!("second")));
                // Not applied yet: still queued behind this action
                assert_eq!(handle.snapshot().edited_title(), "first");
            }
            d.fetch_sub(1, Ordering::SeqCst);
        });

        store.dispatch(edit("title", json!("first")));

        assert_eq!(max_depth.load(Ordering::SeqCst), 1);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(store.snapshot().edited_title(), "second");
    }

    #[test]
    fn test_panicking_listener_does_not_stall_store() {
        let store = EditorStore::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        let failing = store.subscribe(|_, _| panic!("listener failure"));
        store.subscribe(move |_, _| {
            s.fetch_add(1, Ordering::SeqCst);
        });

        store.dispatch(edit("title", json!("a")));
        assert_eq!(store.version(), 1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        store.unsubscribe(failing);
        store.dispatch(edit("title", json!("b")));
        assert_eq!(store.version(), 2);
        assert_eq!(store.snapshot().edited_title(), "b");
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let store = EditorStore::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let id = store.subscribe(move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        store.dispatch(edit("a", json!(1)));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(edit("a", json!(2)));

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_record() {
        let store = EditorStore::new();
        store
            .dispatch_record(json!({
                "type": "RESET_BLOCKS",
                "blocks": [{"clientId": "x", "name": "core/text", "attributes": {}}]
            }))
            .unwrap();
        store
            .dispatch_record(json!({
                "type": "UPDATE_BLOCK_ATTRIBUTES",
                "clientId": "x",
                "attributes": {"content": "hi"}
            }))
            .unwrap();

        let block = store.block(&ClientId::new("x")).unwrap();
        assert_eq!(
            block.attributes,
            Attributes::from([("content".to_string(), json!("hi"))])
        );

        let version = store.version();
        store.dispatch_record(json!({"type": "OPEN_SIDEBAR"})).unwrap();
        assert_eq!(store.version(), version);
        assert!(store.dispatch_record(json!({"no": "type"})).is_err());
    }
}
