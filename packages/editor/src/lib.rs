//! # Blockpress Editor
//!
//! Editing session state for block documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ bootstrap: post + settings → EditorStore    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ store: single-writer dispatch queue         │
//! │  - reducer applies one action at a time     │
//! │  - bounded undo/redo of document snapshots  │
//! │  - listeners notified after each action     │
//! └─────────────────────────────────────────────┘
//!                     ↑ dispatch
//! ┌─────────────────────────────────────────────┐
//! │ controller: per-instance bridge             │
//! │  - effective attributes, set_attributes     │
//! │  - async load lifecycle with cancellation   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockpress_blocks::BlockTypeRegistry;
//! use blockpress_editor::{create_editor_instance, EditorSettings, Post};
//!
//! let registry = BlockTypeRegistry::with_core_blocks()?;
//! let store = create_editor_instance(&registry, post, EditorSettings::default());
//!
//! let controllers = BlockControllers::attach(&store);
//! let controller = controllers.controller(&store, &registry, &client_id).unwrap();
//! controller.set_attributes(attributes);
//! store.undo();
//!
//! let markup = store.serialize(&registry);
//! ```

mod actions;
mod bootstrap;
pub mod categories;
mod controller;
mod errors;
mod hierarchy;
mod load;
mod post;
mod records;
mod reducer;
mod settings;
mod state;
mod store;
mod undo_stack;

pub use actions::{Action, ACTION_TYPES};
pub use bootstrap::{create_editor_instance, create_editor_instance_from_json};
pub use controller::{BlockController, BlockControllers};
pub use errors::{ActionError, EditorError, EditorResult, FetchError, TransitionError};
pub use hierarchy::{build_tree, walk, RecordNode};
pub use load::{LoadLifecycle, LoadState, LoadTicket};
pub use post::{Post, RawField, AUTO_DRAFT};
pub use records::{Record, RecordSource, StaticRecords, ROOT_PARENT};
pub use reducer::reduce;
pub use settings::{EditorSettings, DEFAULT_UNDO_CAPACITY};
pub use state::{BlockTree, EditorState, Edits, Snapshot};
pub use store::{EditorStore, Listener, SubscriptionId};
pub use undo_stack::UndoStack;
