//! Client handle for the shard runtime.

use tokio::sync::{mpsc, oneshot};

use super::error::ShardError;
use super::message::{CoordinatorMessage, EntityMessage};
use crate::entity::{Acknowledgement, RegionState, Selection, SelectionCommand};
use crate::grid::region_of;

/// Handle for sending commands to tile entities.
///
/// Cheap to clone. Messages sent through one client to one key are handled
/// in the order they were sent.
#[derive(Clone)]
pub struct ShardClient {
    tx: mpsc::UnboundedSender<CoordinatorMessage>,
}

impl ShardClient {
    pub(super) fn new(tx: mpsc::UnboundedSender<CoordinatorMessage>) -> Self {
        Self { tx }
    }

    fn deliver(&self, entity_id: &str, message: EntityMessage) -> Result<(), ShardError> {
        region_of(entity_id)?;
        self.tx
            .send(CoordinatorMessage::Deliver {
                entity_id: entity_id.to_string(),
                message,
            })
            .map_err(|_| ShardError::Stopped)
    }

    /// Sends a command to the entity for `entity_id` without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`ShardError::Grid`] if the key is not a canonical tile key,
    /// and [`ShardError::Stopped`] if the runtime has shut down.
    pub fn tell(&self, entity_id: &str, command: SelectionCommand) -> Result<(), ShardError> {
        self.deliver(entity_id, EntityMessage::Command(command))
    }

    /// Sends a selection and waits for the outcome.
    ///
    /// Returns `Some` with the acknowledgement when the entity persisted the
    /// selection, `None` when it did not concern the tile.
    pub async fn ask(
        &self,
        entity_id: &str,
        selection: Selection,
    ) -> Result<Option<Acknowledgement>, ShardError> {
        let (reply_to, mut replies) = mpsc::unbounded_channel();
        self.tell(entity_id, SelectionCommand::with_reply(selection, reply_to))?;
        Ok(replies.recv().await)
    }

    /// Snapshot of an entity's state, activating it if needed.
    pub async fn state(&self, entity_id: &str) -> Result<RegionState, ShardError> {
        let (reply, response) = oneshot::channel();
        self.deliver(entity_id, EntityMessage::GetState(reply))?;
        response
            .await
            .map_err(|_| ShardError::EntityUnavailable(entity_id.to_string()))
    }

    /// Number of entity tasks currently running.
    pub async fn active_entities(&self) -> Result<usize, ShardError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(CoordinatorMessage::ActiveCount(reply))
            .map_err(|_| ShardError::Stopped)?;
        response.await.map_err(|_| ShardError::Stopped)
    }
}
