//! A tile entity bound to its journal.
//!
//! `RegionEntity` owns the in-memory [`RegionState`] of one tile and is the
//! only writer of that tile's history. The shard runtime guarantees a single
//! live instance per key; this type only has to follow the
//! validate, persist, apply, reply order for each command.

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::command::{Acknowledgement, SelectionCommand};
use super::event::SelectionAccepted;
use super::state::RegionState;
use super::tag::tag_for;
use crate::grid::{region_of, GridError};
use crate::journal::{persistence_id, EventJournal, JournalError};

/// Errors that prevent an entity from activating.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("Invalid entity key: {0}")]
    Grid(#[from] GridError),

    #[error("Failed to replay entity history: {0}")]
    Journal(#[from] JournalError),
}

/// One live tile entity.
pub struct RegionEntity {
    entity_id: String,
    persistence_id: String,
    tag: String,
    state: RegionState,
    journal: Arc<dyn EventJournal>,
}

impl RegionEntity {
    /// Activates the entity for `entity_id`, replaying its history.
    ///
    /// # Errors
    ///
    /// Fails if the key does not decode or the journal cannot be read.
    pub async fn activate(
        entity_id: impl Into<String>,
        journal: Arc<dyn EventJournal>,
        number_of_shards: u32,
    ) -> Result<Self, EntityError> {
        let entity_id = entity_id.into();
        let region = region_of(&entity_id)?;
        let persistence_id = persistence_id(&entity_id);
        let events = journal.replay(&persistence_id).await?;
        let state = RegionState::replay(region, &events);
        debug!(
            entity_id = %entity_id,
            events = events.len(),
            status = %state.status(),
            "Entity activated"
        );

        Ok(Self {
            tag: tag_for(&entity_id, number_of_shards),
            entity_id,
            persistence_id,
            state,
            journal,
        })
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Sharding tag attached to every event of this entity.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn state(&self) -> &RegionState {
        &self.state
    }

    /// Handles one command.
    ///
    /// Returns `Ok(true)` when the selection was persisted and applied, and
    /// `Ok(false)` when it did not concern this tile. Rejected commands get no
    /// acknowledgement. If persisting fails the state is left untouched and
    /// no acknowledgement is sent.
    pub async fn handle(&mut self, command: SelectionCommand) -> Result<bool, JournalError> {
        let selection = command.selection;
        if !self.state.is_new_selection(&selection) {
            debug!(entity_id = %self.entity_id, %selection, "Selection rejected");
            return Ok(false);
        }

        let event = SelectionAccepted::from(selection);
        let sequence_nr = self
            .journal
            .persist(&self.persistence_id, &self.tag, &event)
            .await?;
        self.state.apply(&event);
        debug!(
            entity_id = %self.entity_id,
            sequence_nr,
            %event,
            selections = self.state.selections().len(),
            "Selection accepted"
        );

        if let Some(reply_to) = command.reply_to {
            // The requester may have stopped waiting
            let _ = reply_to.send(Acknowledgement {
                entity_id: self.entity_id.clone(),
                selection,
            });
        }
        Ok(true)
    }
}
