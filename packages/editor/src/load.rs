//! # Async Load Lifecycle
//!
//! ```text
//!          begin            resolve(Ok)
//!   Idle ────────► Loading ────────────► Ready
//!    │               │  │
//!    │ abort         │  └─ resolve(Err) ─► Failed ─ retry ─► Loading
//!    ▼               ▼ abort
//!  Aborted ◄─────────┘
//! ```
//!
//! Each `begin`/`retry` hands out a ticket. A result is only applied when
//! its ticket is the current one and the lifecycle is still Loading; results
//! arriving after an abort, or from a superseded attempt, are discarded.

use crate::errors::{FetchError, TransitionError};
use crate::records::Record;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready(Arc<Vec<Record>>),
    Failed(FetchError),
    Aborted,
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Ready(_) | LoadState::Aborted)
    }

    pub fn records(&self) -> Option<&[Record]> {
        match self {
            LoadState::Ready(records) => Some(records.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Idle => f.write_str("idle"),
            LoadState::Loading => f.write_str("loading"),
            LoadState::Ready(records) => write!(f, "ready ({} records)", records.len()),
            LoadState::Failed(error) => write!(f, "failed ({error})"),
            LoadState::Aborted => f.write_str("aborted"),
        }
    }
}

/// Handle for one fetch attempt
#[derive(Debug, Clone)]
pub struct LoadTicket {
    attempt: u64,
    token: CancellationToken,
}

impl LoadTicket {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[derive(Debug)]
pub struct LoadLifecycle {
    state: LoadState,
    attempt: u64,
    token: Option<CancellationToken>,
}

impl Default for LoadLifecycle {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            attempt: 0,
            token: None,
        }
    }
}

impl LoadLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Idle → Loading
    pub fn begin(&mut self) -> Result<LoadTicket, TransitionError> {
        match self.state {
            LoadState::Idle => Ok(self.start()),
            _ => Err(TransitionError::invalid("begin", &self.state)),
        }
    }

    /// Failed → Loading
    pub fn retry(&mut self) -> Result<LoadTicket, TransitionError> {
        match self.state {
            LoadState::Failed(_) => Ok(self.start()),
            _ => Err(TransitionError::invalid("retry", &self.state)),
        }
    }

    fn start(&mut self) -> LoadTicket {
        self.attempt += 1;
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        self.state = LoadState::Loading;
        LoadTicket {
            attempt: self.attempt,
            token,
        }
    }

    /// Apply a fetch outcome. Returns false when the outcome was discarded.
    pub fn resolve(&mut self, ticket: &LoadTicket, outcome: Result<Vec<Record>, FetchError>) -> bool {
        if ticket.attempt != self.attempt || !self.state.is_loading() {
            debug!(state = %self.state, attempt = ticket.attempt, "Discarding late fetch result");
            return false;
        }

        self.token = None;
        self.state = match outcome {
            Ok(records) => LoadState::Ready(Arc::new(records)),
            Err(error) => LoadState::Failed(error),
        };
        true
    }

    /// Idle or Loading → Aborted, cancelling any fetch in flight.
    ///
    /// Ready and Failed are left alone. Returns whether a transition happened.
    pub fn abort(&mut self) -> bool {
        if !matches!(self.state, LoadState::Idle | LoadState::Loading) {
            return false;
        }
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.state = LoadState::Aborted;
        true
    }
}
