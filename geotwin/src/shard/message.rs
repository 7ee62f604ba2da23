//! Messages exchanged between clients, the coordinator and entity tasks.

use tokio::sync::oneshot;

use crate::entity::{RegionState, SelectionCommand};

/// A message for one entity's mailbox.
#[derive(Debug)]
pub(super) enum EntityMessage {
    Command(SelectionCommand),
    GetState(oneshot::Sender<RegionState>),
}

/// A message for the coordinator.
#[derive(Debug)]
pub(super) enum CoordinatorMessage {
    /// Route a message to an entity, activating it if needed
    Deliver {
        entity_id: String,
        message: EntityMessage,
    },
    /// An entity has been idle and asks to stop
    Passivate { entity_id: String, incarnation: u64 },
    /// An entity task has exited
    Stopped { entity_id: String, incarnation: u64 },
    /// Number of running entity tasks
    ActiveCount(oneshot::Sender<usize>),
}
