//! # Block Controllers
//!
//! A `BlockController` is the edit-time bridge for one block instance: it
//! reads effective attributes from the store, writes through dispatch, and
//! owns the instance's async load lifecycle. Fetched records stay in the
//! controller; they are never written into the editor state.
//!
//! `BlockControllers` keeps one controller per live instance and disposes
//! controllers whose instance leaves the document.

use crate::actions::Action;
use crate::errors::{EditorResult, FetchError, TransitionError};
use crate::load::{LoadLifecycle, LoadState, LoadTicket};
use crate::records::{Record, RecordSource};
use crate::state::Snapshot;
use crate::store::{EditorStore, SubscriptionId};
use blockpress_blocks::{
    Attributes, BlockType, BlockTypeRegistry, ClientId, EditCapability, RecordQuery, WrapperProps,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct BlockController {
    client_id: ClientId,
    name: String,
    block_type: Option<Arc<BlockType>>,
    store: EditorStore,
    lifecycle: Arc<Mutex<LoadLifecycle>>,
    disposed: Arc<AtomicBool>,
}

impl BlockController {
    pub fn new(store: &EditorStore, registry: &BlockTypeRegistry, client_id: ClientId) -> Self {
        let name = store
            .block(&client_id)
            .map(|block| block.name)
            .unwrap_or_default();
        let block_type = registry.lookup(&name).block_type().cloned();

        Self {
            client_id,
            name,
            block_type,
            store: store.clone(),
            lifecycle: Arc::new(Mutex::new(LoadLifecycle::new())),
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn block_type(&self) -> Option<&Arc<BlockType>> {
        self.block_type.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Stored attributes over type defaults; defaults alone once the instance is gone
    pub fn effective_attributes(&self) -> Attributes {
        match (self.store.block(&self.client_id), &self.block_type) {
            (Some(block), Some(block_type)) if !block.is_opaque() => {
                block_type.resolve_attributes(&block.attributes)
            }
            (Some(block), _) => block.attributes,
            (None, Some(block_type)) => block_type.defaults().clone(),
            (None, None) => Attributes::new(),
        }
    }

    /// Dispatch an attribute update for this instance. Returns false after `dispose`.
    pub fn set_attributes(&self, attributes: Attributes) -> bool {
        if self.is_disposed() {
            debug!(client_id = %self.client_id, "Ignoring attribute update on disposed block");
            return false;
        }
        self.store.dispatch(Action::UpdateBlockAttributes {
            client_id: self.client_id.clone(),
            attributes,
        });
        true
    }

    /// Flip a boolean attribute
    pub fn toggle(&self, attribute: &str) -> bool {
        let current = self
            .effective_attributes()
            .get(attribute)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        self.set_attributes(Attributes::from([(
            attribute.to_string(),
            Value::Bool(!current),
        )]))
    }

    pub fn wrapper_props(&self) -> Option<WrapperProps> {
        let block_type = self.block_type.as_ref()?;
        block_type.edit_wrapper_props(&self.effective_attributes())
    }

    /// Tear the controller down. Safe to call more than once.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        let aborted = self.lock_lifecycle().abort();
        debug!(client_id = %self.client_id, aborted, "Disposed block controller");
    }

    pub fn load_state(&self) -> LoadState {
        self.lock_lifecycle().state().clone()
    }

    pub fn records(&self) -> Option<Vec<Record>> {
        self.lock_lifecycle().state().records().map(<[Record]>::to_vec)
    }

    /// Run the load lifecycle to completion
    pub async fn load(&self, source: Arc<dyn RecordSource>) -> EditorResult<LoadState> {
        let query = self.query()?;
        let ticket = self.lock_lifecycle().begin()?;
        Ok(self.run(ticket, query, source).await)
    }

    /// Start loading on the runtime. The lifecycle is Loading when this returns.
    pub fn spawn_load(&self, source: Arc<dyn RecordSource>) -> EditorResult<JoinHandle<LoadState>> {
        let query = self.query()?;
        let ticket = self.lock_lifecycle().begin()?;
        Ok(self.spawn_run(ticket, query, source))
    }

    /// Start a new attempt after a failure
    pub fn retry(&self, source: Arc<dyn RecordSource>) -> EditorResult<JoinHandle<LoadState>> {
        let query = self.query()?;
        let ticket = self.lock_lifecycle().retry()?;
        Ok(self.spawn_run(ticket, query, source))
    }

    fn query(&self) -> Result<RecordQuery, TransitionError> {
        match self.block_type.as_deref().map(BlockType::edit) {
            Some(EditCapability::AsyncData { query }) => Ok(query.clone()),
            _ => Err(TransitionError::NotAsync(self.name.clone())),
        }
    }

    fn spawn_run(
        &self,
        ticket: LoadTicket,
        query: RecordQuery,
        source: Arc<dyn RecordSource>,
    ) -> JoinHandle<LoadState> {
        let controller = self.clone();
        tokio::spawn(async move { controller.run(ticket, query, source).await })
    }

    #[instrument(skip_all, fields(client_id = %self.client_id, resource = %query.resource))]
    async fn run(
        &self,
        ticket: LoadTicket,
        query: RecordQuery,
        source: Arc<dyn RecordSource>,
    ) -> LoadState {
        let token = ticket.token().clone();
        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => Err(FetchError::Cancelled),
            outcome = source.fetch(&query, token.clone()) => outcome,
        };

        let mut lifecycle = self.lock_lifecycle();
        if lifecycle.resolve(&ticket, outcome) {
            debug!(state = %lifecycle.state(), "Load settled");
        }
        lifecycle.state().clone()
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, LoadLifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One controller per live block instance
#[derive(Clone, Default)]
pub struct BlockControllers {
    inner: Arc<Mutex<HashMap<ClientId, BlockController>>>,
    subscription: Option<Arc<Subscription>>,
}

/// Store listener owned by a controller set; removed when the last clone drops
struct Subscription {
    store: EditorStore,
    id: SubscriptionId,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.store.unsubscribe(self.id);
    }
}

impl BlockControllers {
    /// Create a set that disposes controllers as their instances leave `store`
    pub fn attach(store: &EditorStore) -> Self {
        let inner: Arc<Mutex<HashMap<ClientId, BlockController>>> = Arc::default();
        let weak: Weak<Mutex<HashMap<ClientId, BlockController>>> = Arc::downgrade(&inner);

        let id = store.subscribe(move |_, snapshot| {
            if let Some(inner) = weak.upgrade() {
                prune(&inner, snapshot);
            }
        });

        Self {
            inner,
            subscription: Some(Arc::new(Subscription {
                store: store.clone(),
                id,
            })),
        }
    }

    /// Controller for a live instance, created on first use
    pub fn controller(
        &self,
        store: &EditorStore,
        registry: &BlockTypeRegistry,
        client_id: &ClientId,
    ) -> Option<BlockController> {
        store.block(client_id)?;

        let mut map = lock(&self.inner);
        if let Some(existing) = map.get(client_id) {
            if !existing.is_disposed() {
                return Some(existing.clone());
            }
        }
        let controller = BlockController::new(store, registry, client_id.clone());
        map.insert(client_id.clone(), controller.clone());
        Some(controller)
    }

    /// Dispose controllers whose instance is not in `snapshot`
    pub fn prune(&self, snapshot: &Snapshot) -> usize {
        prune(&self.inner, snapshot)
    }

    pub fn dispose_all(&self) {
        let drained: Vec<_> = lock(&self.inner).drain().map(|(_, c)| c).collect();
        for controller in drained {
            controller.dispose();
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock(
    inner: &Mutex<HashMap<ClientId, BlockController>>,
) -> MutexGuard<'_, HashMap<ClientId, BlockController>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn prune(inner: &Mutex<HashMap<ClientId, BlockController>>, snapshot: &Snapshot) -> usize {
    let removed: Vec<BlockController> = {
        let mut map = lock(inner);
        let gone: Vec<ClientId> = map
            .keys()
            .filter(|id| snapshot.block(id).is_none())
            .cloned()
            .collect();
        gone.iter().filter_map(|id| map.remove(id)).collect()
    };

    for controller in &removed {
        controller.dispose();
    }
    removed.len()
}
