//! Per-key single-writer runtime for tile entities.
//!
//! # Architecture
//!
//! ```text
//!  ShardClient ──┐
//!  ShardClient ──┼──▶ coordinator channel ──▶ RegionShards
//!  ShardClient ──┘                              │
//!                          ┌────────────────────┼────────────────────┐
//!                          ▼                    ▼                    ▼
//!                   entity mailbox       entity mailbox       entity mailbox
//!                   RegionEntity         RegionEntity         RegionEntity
//!                   (one task per key, spawned on first use)
//!                          │
//!                          ▼
//!                    EventJournal
//! ```
//!
//! Commands for one key are handled strictly one at a time by that key's
//! entity task, each persisted before the next is looked at. Idle entities
//! passivate and are reactivated from the journal on the next message.

mod client;
mod coordinator;
mod error;
mod message;
mod settings;


pub use client::ShardClient;
pub use coordinator::RegionShards;
pub use error::ShardError;
pub use settings::ShardSettings;
