//! Error types for region timing operations

use thiserror::Error;

/// Errors surfaced by the timer engine
///
/// Every variant indicates a programming mistake at the call site
/// (stopping a region that never started, declaring a name twice under
/// different parents). None of them are retried or recovered internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("name {{{name}}} not exist")]
    NotFound { name: String },

    #[error("name {{{name}}} was stopped without a matching start")]
    NotStarted { name: String },

    #[error(
        "name {{{name}}} duplicated: registered under {registered_parent}, requested under {requested_parent}"
    )]
    NameConflict {
        name: String,
        registered_parent: String,
        requested_parent: String,
    },
}

impl TimerError {
    pub(crate) fn not_found(name: &str) -> Self {
        Self::NotFound {
            name: name.to_string(),
        }
    }

    pub(crate) fn not_started(name: &str) -> Self {
        Self::NotStarted {
            name: name.to_string(),
        }
    }
}

/// Result type for timer operations
pub type Result<T> = std::result::Result<T, TimerError>;
