//! Shared error types for the services crate.

use thiserror::Error;

use lesson_core::model::ResultError;
use storage::repository::StorageError;

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// An answer was submitted to a session that has already completed.
    #[error("session already completed; no further answers accepted")]
    InvalidState,
    /// The result was requested before every task was answered.
    #[error("session is not complete yet")]
    NotComplete,
    /// The current task was requested after the last task was answered.
    #[error("session is complete; there is no current task")]
    Complete,
    #[error(transparent)]
    Aggregation(#[from] ResultError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
