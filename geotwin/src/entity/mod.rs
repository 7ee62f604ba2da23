//! Event-sourced tile entities.
//!
//! Each tile of the grid is an entity keyed by its canonical key. An entity
//! accepts [`SelectionCommand`]s, persists the ones that concern it as
//! [`SelectionAccepted`] events and folds those events into a
//! [`RegionState`]. Replaying the same events always yields the same state.

mod command;
mod event;
mod region_entity;
mod state;
mod tag;

pub use command::{Acknowledgement, Action, ReplyTo, Selection, SelectionCommand};
pub use event::SelectionAccepted;
pub use region_entity::{EntityError, RegionEntity};
pub use state::{RegionState, Selections, Status};
pub use tag::{shard_of, tag_for, TAG_PREFIX};
