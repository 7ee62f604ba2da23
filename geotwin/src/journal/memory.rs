//! In-process journal.

use tokio::sync::Mutex;

use super::r#trait::{EventJournal, JournalFuture, JournalRecord};
use crate::entity::SelectionAccepted;

/// Journal that keeps every record in memory.
///
/// Nothing survives the process, but entities can still be passivated and
/// reactivated within it, which is what the tests rely on.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    records: Mutex<Vec<JournalRecord>>,
}

impl MemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all entities.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl EventJournal for MemoryJournal {
    fn persist<'a>(
        &'a self,
        persistence_id: &'a str,
        tag: &'a str,
        event: &'a SelectionAccepted,
    ) -> JournalFuture<'a, u64> {
        Box::pin(async move {
            let mut records = self.records.lock().await;
            let sequence_nr = records
                .iter()
                .filter(|r| r.persistence_id == persistence_id)
                .count() as u64
                + 1;
            records.push(JournalRecord {
                persistence_id: persistence_id.to_string(),
                sequence_nr,
                tag: tag.to_string(),
                event: *event,
            });
            Ok(sequence_nr)
        })
    }

    fn replay<'a>(&'a self, persistence_id: &'a str) -> JournalFuture<'a, Vec<SelectionAccepted>> {
        Box::pin(async move {
            let records = self.records.lock().await;
            Ok(records
                .iter()
                .filter(|r| r.persistence_id == persistence_id)
                .map(|r| r.event)
                .collect())
        })
    }

    fn events_by_tag<'a>(&'a self, tag: &'a str) -> JournalFuture<'a, Vec<JournalRecord>> {
        Box::pin(async move {
            let records = self.records.lock().await;
            Ok(records.iter().filter(|r| r.tag == tag).cloned().collect())
        })
    }
}
