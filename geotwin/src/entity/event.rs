//! Persisted tile events.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::command::{Action, Selection};
use crate::grid::Region;

/// A selection a tile accepted and persisted.
///
/// This is the only event type. It is stored as JSON with named fields;
/// unknown fields are ignored when reading, so fields can be added later
/// without breaking older journals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionAccepted {
    pub action: Action,
    pub region: Region,
}

impl SelectionAccepted {
    pub fn new(action: Action, region: Region) -> Self {
        Self { action, region }
    }
}

impl From<Selection> for SelectionAccepted {
    fn from(selection: Selection) -> Self {
        Self::new(selection.action, selection.region)
    }
}

impl fmt::Display for SelectionAccepted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SelectionAccepted[{}, {}]", self.action, self.region)
    }
}
