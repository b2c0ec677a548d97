//! Cart error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the cart store.
///
/// Only hydration reads propagate storage failures to the caller; once a
/// store is open, persistence write failures are logged by the writer task
/// and never surfaced here (cart contents are best-effort data).
#[derive(Debug, Error)]
pub enum CartError {
    /// The persistent store could not be read during hydration.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
