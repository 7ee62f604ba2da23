//! The shard coordinator and entity tasks.
//!
//! The coordinator is the only owner of entity mailboxes. It spawns an entity
//! task on first delivery, and tracks each running task by an incarnation
//! number so that late `Passivate` or `Stopped` notices from an older task
//! never affect a newer one.
//!
//! # Passivation
//!
//! ```text
//!   entity idle ──Passivate──▶ coordinator drops mailbox sender
//!                              new messages are buffered
//!   entity drains mailbox, exits ──Stopped──▶ coordinator
//!                              buffer non-empty: spawn next incarnation
//! ```
//!
//! A key therefore never has two live tasks.

use std::collections::HashMap;
use std::future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::client::ShardClient;
use super::message::{CoordinatorMessage, EntityMessage};
use super::settings::ShardSettings;
use crate::entity::RegionEntity;
use crate::journal::EventJournal;

enum EntitySlot {
    Active {
        incarnation: u64,
        mailbox: mpsc::UnboundedSender<EntityMessage>,
    },
    Passivating {
        incarnation: u64,
        buffered: Vec<EntityMessage>,
    },
}

/// Per-key single-writer runtime for tile entities.
pub struct RegionShards {
    rx: mpsc::UnboundedReceiver<CoordinatorMessage>,
    tx: mpsc::WeakUnboundedSender<CoordinatorMessage>,
    journal: Arc<dyn EventJournal>,
    settings: ShardSettings,
    slots: HashMap<String, EntitySlot>,
    next_incarnation: u64,
    shutdown: CancellationToken,
}

impl RegionShards {
    /// Spawns the coordinator and returns a client for it.
    ///
    /// Must be called from within a Tokio runtime. The coordinator and all
    /// entities stop when `shutdown` is cancelled.
    pub fn start(
        journal: Arc<dyn EventJournal>,
        settings: ShardSettings,
        shutdown: CancellationToken,
    ) -> ShardClient {
        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            rx,
            tx: tx.downgrade(),
            journal,
            settings,
            slots: HashMap::new(),
            next_incarnation: 0,
            shutdown,
        };
        tokio::spawn(coordinator.run());
        ShardClient::new(tx)
    }

    async fn run(mut self) {
        tracing::info!(
            number_of_shards = self.settings.number_of_shards,
            passivate_after = ?self.settings.passivate_after,
            "Shard coordinator starting"
        );

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    tracing::info!("Shard coordinator shutting down");
                    break;
                }

                message = self.rx.recv() => match message {
                    Some(message) => self.process(message),
                    // Every client and entity is gone
                    None => break,
                },
            }
        }

        debug!(entities = self.slots.len(), "Shard coordinator stopped");
    }

    fn process(&mut self, message: CoordinatorMessage) {
        match message {
            CoordinatorMessage::Deliver { entity_id, message } => self.deliver(entity_id, message),
            CoordinatorMessage::Passivate {
                entity_id,
                incarnation,
            } => self.passivate(&entity_id, incarnation),
            CoordinatorMessage::Stopped {
                entity_id,
                incarnation,
            } => self.stopped(entity_id, incarnation),
            CoordinatorMessage::ActiveCount(reply) => {
                let _ = reply.send(self.slots.len());
            }
        }
    }

    fn deliver(&mut self, entity_id: String, message: EntityMessage) {
        let Some(slot) = self.slots.get_mut(&entity_id) else {
            self.spawn(entity_id, vec![message]);
            return;
        };

        match slot {
            EntitySlot::Active {
                incarnation,
                mailbox,
            } => {
                if let Err(mpsc::error::SendError(message)) = mailbox.send(message) {
                    // The task is exiting; hold the message for the next one
                    let incarnation = *incarnation;
                    *slot = EntitySlot::Passivating {
                        incarnation,
                        buffered: vec![message],
                    };
                }
            }
            EntitySlot::Passivating { buffered, .. } => buffered.push(message),
        }
    }

    fn passivate(&mut self, entity_id: &str, incarnation: u64) {
        if let Some(slot) = self.slots.get_mut(entity_id) {
            if matches!(slot, EntitySlot::Active { incarnation: i, .. } if *i == incarnation) {
                debug!(entity_id, incarnation, "Passivating entity");
                *slot = EntitySlot::Passivating {
                    incarnation,
                    buffered: Vec::new(),
                };
            }
        }
    }

    fn stopped(&mut self, entity_id: String, incarnation: u64) {
        let current = match self.slots.get(&entity_id) {
            Some(EntitySlot::Active { incarnation: i, .. })
            | Some(EntitySlot::Passivating { incarnation: i, .. }) => *i,
            None => return,
        };
        if current != incarnation {
            return;
        }

        match self.slots.remove(&entity_id) {
            Some(EntitySlot::Passivating { buffered, .. }) if !buffered.is_empty() => {
                debug!(
                    entity_id = %entity_id,
                    buffered = buffered.len(),
                    "Reactivating entity with buffered messages"
                );
                self.spawn(entity_id, buffered);
            }
            _ => debug!(entity_id = %entity_id, incarnation, "Entity stopped"),
        }
    }

    fn spawn(&mut self, entity_id: String, initial: Vec<EntityMessage>) {
        let Some(coordinator) = self.tx.upgrade() else {
            return;
        };

        self.next_incarnation += 1;
        let incarnation = self.next_incarnation;
        let (mailbox, inbox) = mpsc::unbounded_channel();
        for message in initial {
            let _ = mailbox.send(message);
        }

        let task = EntityTask {
            entity_id: entity_id.clone(),
            incarnation,
            inbox,
            journal: Arc::clone(&self.journal),
            settings: self.settings,
            coordinator,
            shutdown: self.shutdown.clone(),
        };
        tokio::spawn(task.run());

        self.slots.insert(
            entity_id,
            EntitySlot::Active {
                incarnation,
                mailbox,
            },
        );
    }
}

/// Reports the task's exit to the coordinator, including on panic.
struct StoppedGuard {
    entity_id: String,
    incarnation: u64,
    coordinator: mpsc::UnboundedSender<CoordinatorMessage>,
}

impl Drop for StoppedGuard {
    fn drop(&mut self) {
        let _ = self.coordinator.send(CoordinatorMessage::Stopped {
            entity_id: std::mem::take(&mut self.entity_id),
            incarnation: self.incarnation,
        });
    }
}

struct EntityTask {
    entity_id: String,
    incarnation: u64,
    inbox: mpsc::UnboundedReceiver<EntityMessage>,
    journal: Arc<dyn EventJournal>,
    settings: ShardSettings,
    coordinator: mpsc::UnboundedSender<CoordinatorMessage>,
    shutdown: CancellationToken,
}

impl EntityTask {
    async fn run(mut self) {
        let _guard = StoppedGuard {
            entity_id: self.entity_id.clone(),
            incarnation: self.incarnation,
            coordinator: self.coordinator.clone(),
        };

        let mut entity = match RegionEntity::activate(
            self.entity_id.clone(),
            Arc::clone(&self.journal),
            self.settings.number_of_shards,
        )
        .await
        {
            Ok(entity) => entity,
            Err(e) => {
                warn!(entity_id = %self.entity_id, error = %e, "Entity activation failed");
                return;
            }
        };

        let idle_after = self.settings.passivate_after;
        let mut deadline = idle_after.map(|d| Instant::now() + d);

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => break,

                message = self.inbox.recv() => {
                    match message {
                        Some(EntityMessage::Command(command)) => {
                            if let Err(e) = entity.handle(command).await {
                                let dropped = self.drop_queued();
                                warn!(
                                    entity_id = %self.entity_id,
                                    error = %e,
                                    dropped,
                                    "Persist failed, stopping entity"
                                );
                                break;
                            }
                        }
                        Some(EntityMessage::GetState(reply)) => {
                            let _ = reply.send(entity.state().clone());
                        }
                        // Mailbox closed by passivation and fully drained
                        None => break,
                    }
                    if deadline.is_some() {
                        deadline = idle_after.map(|d| Instant::now() + d);
                    }
                }

                _ = idle(deadline) => {
                    deadline = None;
                    let _ = self.coordinator.send(CoordinatorMessage::Passivate {
                        entity_id: self.entity_id.clone(),
                        incarnation: self.incarnation,
                    });
                }
            }
        }
    }

    /// Closes the mailbox and discards what is already queued in it.
    ///
    /// Returns the number of discarded commands. Their reply channels close
    /// unanswered. Messages sent after the close are buffered by the
    /// coordinator for the next incarnation.
    fn drop_queued(&mut self) -> usize {
        self.inbox.close();
        let mut dropped = 0;
        while let Ok(message) = self.inbox.try_recv() {
            if matches!(message, EntityMessage::Command(_)) {
                dropped += 1;
            }
        }
        dropped
    }
}

async fn idle(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}
