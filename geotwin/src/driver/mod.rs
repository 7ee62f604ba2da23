//! Fan-out of user selections to tile entities.
//!
//! A selection over an area concerns every tile at the area's zoom that
//! overlaps it, and every ancestor of those tiles. [`SelectionDriver`]
//! delivers the same selection to all of them and reports which accepted.

use std::collections::HashSet;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::entity::{Action, Selection, SelectionCommand};
use crate::grid::{ancestors, key_of, tiles_intersecting, Region};
use crate::shard::{ShardClient, ShardError};

/// Result of delivering one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Number of entities the selection was sent to
    pub delivered: usize,
    /// Keys of the entities that persisted it, in arrival order
    pub acknowledged: Vec<String>,
}

/// Keys of every entity a selection over `area` must reach.
///
/// Ancestors come before their descendants, starting at the root, and each
/// key appears once.
pub fn fan_out_keys(area: &Region) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for target in tiles_intersecting(area) {
        for tile in ancestors(&target).into_iter().chain(std::iter::once(target)) {
            let key = key_of(&tile);
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }
    }
    keys
}

/// Sends selections to every entity they concern.
#[derive(Clone)]
pub struct SelectionDriver {
    client: ShardClient,
}

impl SelectionDriver {
    pub fn new(client: ShardClient) -> Self {
        Self { client }
    }

    /// Delivers `action` over `area` and waits until every entity has
    /// handled it.
    ///
    /// # Errors
    ///
    /// Returns [`ShardError::Stopped`] if the runtime shuts down before all
    /// commands were sent.
    pub async fn submit(
        &self,
        action: Action,
        area: Region,
    ) -> Result<SelectionOutcome, ShardError> {
        let selection = Selection::new(action, area);
        let keys = fan_out_keys(&area);
        debug!(%selection, targets = keys.len(), "Fanning out selection");

        let (reply_to, mut replies) = mpsc::unbounded_channel();
        for key in &keys {
            self.client
                .tell(key, SelectionCommand::with_reply(selection, reply_to.clone()))?;
        }
        drop(reply_to);

        let mut acknowledged = Vec::new();
        while let Some(ack) = replies.recv().await {
            acknowledged.push(ack.entity_id);
        }

        info!(
            %selection,
            delivered = keys.len(),
            acknowledged = acknowledged.len(),
            "Selection delivered"
        );
        Ok(SelectionOutcome {
            delivered: keys.len(),
            acknowledged,
        })
    }
}
