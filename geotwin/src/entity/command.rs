//! Selection commands and acknowledgements.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio::sync::mpsc;

use crate::grid::Region;

/// What a selection asks a tile to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Record the region as selected
    Create,
    /// Remove selections inside the region
    Delete,
    /// Mark device tiles as happy
    Happy,
    /// Mark device tiles as sad
    Sad,
}

impl Action {
    /// All actions, in declaration order.
    pub const ALL: [Action; 4] = [Action::Create, Action::Delete, Action::Happy, Action::Sad];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Delete => write!(f, "delete"),
            Action::Happy => write!(f, "happy"),
            Action::Sad => write!(f, "sad"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(Action::Create),
            "delete" => Ok(Action::Delete),
            "happy" => Ok(Action::Happy),
            "sad" => Ok(Action::Sad),
            other => Err(format!(
                "unknown action '{}' (expected create, delete, happy or sad)",
                other
            )),
        }
    }
}

/// An action applied to a region of the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub action: Action,
    pub region: Region,
}

impl Selection {
    pub fn new(action: Action, region: Region) -> Self {
        Self { action, region }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.region)
    }
}

/// Acknowledgement that an entity persisted a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Acknowledgement {
    /// Key of the acknowledging entity
    pub entity_id: String,
    /// The selection as it was received
    pub selection: Selection,
}

/// Where acknowledgements are sent.
///
/// One destination may be shared by all commands of a fan-out; the sender
/// learns which tiles accepted from [`Acknowledgement::entity_id`].
pub type ReplyTo = mpsc::UnboundedSender<Acknowledgement>;

/// A selection addressed to one tile entity.
#[derive(Debug)]
pub struct SelectionCommand {
    pub selection: Selection,
    pub reply_to: Option<ReplyTo>,
}

impl SelectionCommand {
    /// A command that expects no acknowledgement.
    pub fn new(selection: Selection) -> Self {
        Self {
            selection,
            reply_to: None,
        }
    }

    /// A command acknowledged through `reply_to` once persisted.
    pub fn with_reply(selection: Selection, reply_to: ReplyTo) -> Self {
        Self {
            selection,
            reply_to: Some(reply_to),
        }
    }
}
