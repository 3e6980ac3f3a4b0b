//! Error types for the editor

use crate::load::LoadState;
use blockpress_blocks::RegistrationError;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Load lifecycle error: {0}")]
    Transition(#[from] TransitionError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure decoding a dispatched action record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("Action record has no string 'type' field")]
    MissingType,

    #[error("Malformed '{action}' action: {message}")]
    Payload { action: String, message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    #[error("Cannot {operation} a load that is {state}")]
    Invalid {
        operation: &'static str,
        state: LoadState,
    },

    #[error("Block type '{0}' does not load external data")]
    NotAsync(String),
}

impl TransitionError {
    pub fn invalid(operation: &'static str, state: &LoadState) -> Self {
        Self::Invalid {
            operation,
            state: state.clone(),
        }
    }
}

/// Failure reported by a record source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request was cancelled")]
    Cancelled,

    #[error("Request failed: {0}")]
    Failed(String),
}
