//! Durable event storage for tile entities.
//!
//! Entities depend only on the [`EventJournal`] trait:
//!
//! - [`FileJournal`]: JSON-lines file on local disk
//! - [`MemoryJournal`]: in-process store for tests and embedding
//!
//! Records are addressed by persistence id (see [`persistence_id`]) and can
//! be queried in bulk by sharding tag.

mod file;
mod memory;
mod r#trait;

pub use file::{FileJournal, JOURNAL_FILE};
pub use memory::MemoryJournal;
pub use r#trait::{EventJournal, JournalError, JournalFuture, JournalRecord};

/// Entity type name used in persistence ids.
pub const ENTITY_TYPE: &str = "Region";

/// Persistence id of the entity with the given key.
pub fn persistence_id(entity_id: &str) -> String {
    format!("{}|{}", ENTITY_TYPE, entity_id)
}
