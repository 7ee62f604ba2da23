//! Event journal trait definition.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

use crate::entity::SelectionAccepted;

/// Errors surfaced by journal implementations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Reading or writing the backing store failed
    #[error("Journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An event could not be encoded
    #[error("Failed to encode journal record: {0}")]
    Encode(#[from] serde_json::Error),

    /// A stored record could not be decoded
    #[error("Corrupt journal record at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    /// A failed write could not be rolled back, so the store no longer
    /// accepts appends
    #[error("Journal is read-only after a failed rollback: {0}")]
    Poisoned(String),
}

/// One persisted event together with its addressing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalRecord {
    /// Persistence id of the owning entity
    pub persistence_id: String,
    /// Position within the entity's history, starting at 1
    pub sequence_nr: u64,
    /// Sharding tag of the owning entity
    pub tag: String,
    pub event: SelectionAccepted,
}

/// Boxed future returned by journal operations.
pub type JournalFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, JournalError>> + Send + 'a>>;

/// Durable, append-only store of entity events.
///
/// An event is either fully persisted, and then visible to every later
/// `replay` of its entity, or not persisted at all.
pub trait EventJournal: Send + Sync {
    /// Appends an event to an entity's history.
    ///
    /// Returns the event's sequence number within that history.
    fn persist<'a>(
        &'a self,
        persistence_id: &'a str,
        tag: &'a str,
        event: &'a SelectionAccepted,
    ) -> JournalFuture<'a, u64>;

    /// Every event of an entity, in persisted order.
    fn replay<'a>(&'a self, persistence_id: &'a str) -> JournalFuture<'a, Vec<SelectionAccepted>>;

    /// Every record carrying `tag`, in global persisted order.
    fn events_by_tag<'a>(&'a self, tag: &'a str) -> JournalFuture<'a, Vec<JournalRecord>>;
}
