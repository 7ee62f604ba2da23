//! Per-tile state and the selection merge rules.
//!
//! Every predicate here is evaluated relative to the owning tile's own
//! region. A selection either contains the tile (a broader selection sweeping
//! over it) or is contained by the tile (a finer selection inside it); any
//! other selection does not concern the tile at all.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::command::{Action, Selection};
use super::event::SelectionAccepted;
use crate::grid::Region;

/// Visual status of a tile. Only device tiles are ever happy or sad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Happy,
    Sad,
    Neutral,
}

impl Status {
    /// The status a tile takes on after a happy/sad event.
    fn derive(region: &Region, requested: Status) -> Status {
        if region.is_device() {
            requested
        } else {
            Status::Neutral
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Happy => write!(f, "happy"),
            Status::Sad => write!(f, "sad"),
            Status::Neutral => write!(f, "neutral"),
        }
    }
}

/// Regions selected within one tile.
///
/// Invariant: no member contains another member.
#[derive(Debug, Clone, PartialEq)]
pub struct Selections {
    region: Region,
    current: Vec<Region>,
}

impl Selections {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            current: Vec::new(),
        }
    }

    /// Current selections in acceptance order.
    pub fn as_slice(&self) -> &[Region] {
        &self.current
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// The selection covers the whole owning tile.
    pub fn is_contained_within(&self, selection: &Region) -> bool {
        selection.contains(&self.region)
    }

    /// The selection lies inside the owning tile.
    pub fn is_container_of(&self, selection: &Region) -> bool {
        self.region.contains(selection)
    }

    /// The selection lies inside the owning tile and is not already covered.
    pub fn is_container_of_visible(&self, selection: &Region) -> bool {
        self.is_container_of(selection) && self.is_visible(selection)
    }

    fn is_visible(&self, selection: &Region) -> bool {
        !self.current.iter().any(|current| current.contains(selection))
    }

    fn create(&mut self, selection: Region) {
        if self.is_contained_within(&selection) {
            self.current.clear();
            self.current.push(selection);
        } else if self.is_container_of(&selection) {
            self.current.retain(|current| !selection.contains(current));
            self.current.push(selection);
        }
    }

    fn delete(&mut self, selection: &Region) {
        if self.is_contained_within(selection) {
            self.current.clear();
        } else if self.is_container_of(selection) {
            self.current.retain(|current| !selection.contains(current));
        }
    }
}

/// Complete state of one tile entity.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionState {
    region: Region,
    selections: Selections,
    status: Status,
}

impl RegionState {
    /// Default state for a tile that has no events yet.
    pub fn new(region: Region) -> Self {
        let status = if region.is_device() {
            Status::Happy
        } else {
            Status::Neutral
        };
        Self {
            region,
            selections: Selections::new(region),
            status,
        }
    }

    /// Rebuilds state by applying events in persisted order.
    pub fn replay<'a>(
        region: Region,
        events: impl IntoIterator<Item = &'a SelectionAccepted>,
    ) -> Self {
        let mut state = Self::new(region);
        for event in events {
            state.apply(event);
        }
        state
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Decides whether a selection would change this tile.
    ///
    /// Creates inside the tile are rejected when an existing selection already
    /// covers them, which makes redelivered or re-fanned-out commands no-ops.
    pub fn is_new_selection(&self, selection: &Selection) -> bool {
        let target = &selection.region;
        match selection.action {
            Action::Create => {
                self.selections.is_contained_within(target)
                    || self.selections.is_container_of_visible(target)
            }
            Action::Delete | Action::Happy | Action::Sad => {
                self.selections.is_contained_within(target)
                    || self.selections.is_container_of(target)
            }
        }
    }

    /// Applies a persisted event.
    pub fn apply(&mut self, event: &SelectionAccepted) {
        match event.action {
            Action::Create => self.selections.create(event.region),
            Action::Delete => self.selections.delete(&event.region),
            Action::Happy => self.status = Status::derive(&self.region, Status::Happy),
            Action::Sad => self.status = Status::derive(&self.region, Status::Sad),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{parent, subdivide, tile_at, LatLng, MAX_ZOOM};

    fn zoom5() -> Region {
        tile_at(5, LatLng::new(48.8566, 2.3522)).unwrap()
    }

    fn create(region: Region) -> Selection {
        Selection::new(Action::Create, region)
    }

    fn delete(region: Region) -> Selection {
        Selection::new(Action::Delete, region)
    }

    /// Validates and applies like the entity does, returning whether it was accepted.
    fn offer(state: &mut RegionState, selection: Selection) -> bool {
        let accepted = state.is_new_selection(&selection);
        if accepted {
            state.apply(&selection.into());
        }
        accepted
    }

    fn assert_no_mutual_containment(selections: &Selections) {
        let current = selections.as_slice();
        for (i, a) in current.iter().enumerate() {
            for (j, b) in current.iter().enumerate() {
                if i != j {
                    assert!(!a.contains(b), "{} contains {}", a, b);
                }
            }
        }
    }

    // =========================================================================
    // Status
    // =========================================================================

    #[test]
    fn test_device_starts_happy() {
        let device = tile_at(MAX_ZOOM, LatLng::new(1.0, 1.0)).unwrap();
        assert_eq!(RegionState::new(device).status(), Status::Happy);
    }

    #[test]
    fn test_non_device_starts_neutral() {
        assert_eq!(RegionState::new(zoom5()).status(), Status::Neutral);
    }

    #[test]
    fn test_sad_is_idempotent_for_devices() {
        let device = tile_at(MAX_ZOOM, LatLng::new(1.0, 1.0)).unwrap();
        let mut state = RegionState::new(device);
        let sad = SelectionAccepted::new(Action::Sad, device);

        state.apply(&sad);
        assert_eq!(state.status(), Status::Sad);
        state.apply(&sad);
        assert_eq!(state.status(), Status::Sad);

        state.apply(&SelectionAccepted::new(Action::Happy, device));
        assert_eq!(state.status(), Status::Happy);
    }

    #[test]
    fn test_non_device_stays_neutral() {
        let tile = zoom5();
        let mut state = RegionState::new(tile);
        state.apply(&SelectionAccepted::new(Action::Sad, tile));
        assert_eq!(state.status(), Status::Neutral);
        state.apply(&SelectionAccepted::new(Action::Happy, tile));
        assert_eq!(state.status(), Status::Neutral);
    }

    #[test]
    fn test_happy_sad_accepted_without_consulting_selections() {
        let tile = zoom5();
        let mut state = RegionState::new(tile);
        assert!(offer(&mut state, create(tile)));
        let inner = subdivide(&tile)[0];
        assert!(state.is_new_selection(&Selection::new(Action::Sad, inner)));
        assert!(state.is_new_selection(&Selection::new(Action::Happy, tile)));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn test_unrelated_selection_rejected() {
        let tile = zoom5();
        let state = RegionState::new(tile);
        let elsewhere = tile_at(5, LatLng::new(-33.8688, 151.2093)).unwrap();
        for action in Action::ALL {
            assert!(!state.is_new_selection(&Selection::new(action, elsewhere)));
        }
    }

    #[test]
    fn test_partially_overlapping_selection_rejected() {
        let tile = zoom5();
        let state = RegionState::new(tile);
        let straddling = Region::new(
            5,
            LatLng::new(tile.top_left().lat + 1.0, tile.top_left().lng + 1.0),
            LatLng::new(tile.bot_right().lat + 1.0, tile.bot_right().lng + 1.0),
        )
        .unwrap();
        assert!(!state.is_new_selection(&create(straddling)));
    }

    #[test]
    fn test_covered_create_is_rejected() {
        let tile = zoom5();
        let mut state = RegionState::new(tile);
        let quarter = subdivide(&tile)[0];
        let eighth = subdivide(&quarter)[3];

        assert!(offer(&mut state, create(quarter)));
        assert!(!offer(&mut state, create(eighth)));
        assert!(!offer(&mut state, create(quarter)));
        assert_eq!(state.selections().as_slice(), &[quarter]);
    }

    #[test]
    fn test_redelivered_create_is_rejected() {
        let tile = zoom5();
        let mut state = RegionState::new(tile);
        let inner = subdivide(&tile)[2];

        assert!(offer(&mut state, create(inner)));
        let before = state.clone();
        assert!(!offer(&mut state, create(inner)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_delete_requires_containment_only() {
        let tile = zoom5();
        let state = RegionState::new(tile);
        // Nothing selected, yet a delete inside the tile is still accepted.
        assert!(state.is_new_selection(&delete(subdivide(&tile)[1])));
    }

    // =========================================================================
    // Merge
    // =========================================================================

    #[test]
    fn test_broader_create_replaces_everything() {
        let tile = zoom5();
        let mut state = RegionState::new(tile);
        let children = subdivide(&tile);
        assert!(offer(&mut state, create(children[0])));
        assert!(offer(&mut state, create(children[3])));
        assert_eq!(state.selections().len(), 2);

        let up = parent(&tile).unwrap();
        assert!(offer(&mut state, create(up)));
        assert_eq!(state.selections().as_slice(), &[up]);

        // A finer create already covered by the parent is now a no-op.
        assert!(!offer(&mut state, create(children[1])));
        assert_eq!(state.selections().as_slice(), &[up]);
    }

    #[test]
    fn test_inner_create_subsumes_finer_selections() {
        let tile = zoom5();
        let mut state = RegionState::new(tile);
        let quarter = subdivide(&tile)[1];
        let eighths = subdivide(&quarter);
        let other_quarter = subdivide(&tile)[2];

        assert!(offer(&mut state, create(eighths[0])));
        assert!(offer(&mut state, create(eighths[3])));
        assert!(offer(&mut state, create(other_quarter)));
        assert!(offer(&mut state, create(quarter)));

        assert_eq!(state.selections().as_slice(), &[other_quarter, quarter]);
    }

    #[test]
    fn test_broad_delete_clears() {
        let tile = zoom5();
        let mut state = RegionState::new(tile);
        for child in subdivide(&tile) {
            assert!(offer(&mut state, create(child)));
        }
        assert!(offer(&mut state, delete(parent(&tile).unwrap())));
        assert!(state.selections().is_empty());
    }

    #[test]
    fn test_inner_delete_removes_only_contained() {
        let tile = zoom5();
        let mut state = RegionState::new(tile);
        let children = subdivide(&tile);
        let grandchild = subdivide(&children[0])[0];
        assert!(offer(&mut state, create(grandchild)));
        assert!(offer(&mut state, create(children[1])));
        assert!(offer(&mut state, create(children[2])));

        assert!(offer(&mut state, delete(children[0])));
        assert_eq!(state.selections().as_slice(), &[children[1], children[2]]);
    }

    #[test]
    fn test_delete_inside_a_selection_keeps_it() {
        let tile = zoom5();
        let mut state = RegionState::new(tile);
        let quarter = subdivide(&tile)[0];
        assert!(offer(&mut state, create(quarter)));
        assert!(offer(&mut state, delete(subdivide(&quarter)[0])));
        assert_eq!(state.selections().as_slice(), &[quarter]);
    }

    #[test]
    fn test_selection_invariant_holds_after_mixed_sequence() {
        let tile = zoom5();
        let mut state = RegionState::new(tile);
        let mut candidates = vec![tile, parent(&tile).unwrap()];
        for child in subdivide(&tile) {
            candidates.push(child);
            candidates.extend(subdivide(&child));
        }

        // Deterministic pseudo-random walk over creates and deletes.
        let mut seed: u64 = 0x5eed;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let region = candidates[(seed >> 33) as usize % candidates.len()];
            let action = if (seed >> 20) % 3 == 0 {
                Action::Delete
            } else {
                Action::Create
            };
            offer(&mut state, Selection::new(action, region));
            assert_no_mutual_containment(state.selections());
        }
    }

    #[test]
    fn test_replay_matches_incremental_application() {
        let tile = zoom5();
        let children = subdivide(&tile);
        let events = vec![
            SelectionAccepted::new(Action::Create, children[0]),
            SelectionAccepted::new(Action::Create, subdivide(&children[1])[2]),
            SelectionAccepted::new(Action::Sad, tile),
            SelectionAccepted::new(Action::Delete, children[0]),
            SelectionAccepted::new(Action::Create, children[1]),
        ];

        let mut incremental = RegionState::new(tile);
        for event in &events {
            incremental.apply(event);
        }
        assert_eq!(RegionState::replay(tile, &events), incremental);
    }
}
