//! Integration tests for the selection workflow.
//!
//! These tests drive the public API end to end:
//! - Fan-out through the driver and the shard runtime
//! - Durability of the file journal across runtime restarts
//! - Merge rules as seen through the runtime
//! - Replay determinism against the live entity state
//! - Tag queries covering every persisted event

use geotwin::driver::{fan_out_keys, SelectionDriver};
use geotwin::entity::{tag_for, Action, RegionState, Selection, Status};
use geotwin::grid::{
    key_of, region_of, root, subdivide, tile_at, tiles_intersecting, LatLng, Region, MAX_ZOOM,
};
use geotwin::journal::{persistence_id, EventJournal, FileJournal, ENTITY_TYPE};
use geotwin::shard::{RegionShards, ShardClient, ShardSettings};
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Test Helpers
// =============================================================================

const SHARDS: u32 = 8;

fn settings() -> ShardSettings {
    ShardSettings {
        number_of_shards: SHARDS,
        passivate_after: None,
    }
}

async fn start(dir: &TempDir) -> (Arc<FileJournal>, ShardClient, CancellationToken) {
    let journal = Arc::new(FileJournal::open(dir.path()).await.unwrap());
    let shutdown = CancellationToken::new();
    let client = RegionShards::start(journal.clone(), settings(), shutdown.clone());
    (journal, client, shutdown)
}

fn zoom3_tile() -> Region {
    tile_at(3, LatLng::new(45.0, 12.0)).unwrap()
}

// =============================================================================
// Durability
// =============================================================================

#[tokio::test]
async fn test_selection_survives_restart() {
    let dir = TempDir::new().unwrap();
    let tile = zoom3_tile();

    {
        let (_journal, client, shutdown) = start(&dir).await;
        let outcome = SelectionDriver::new(client)
            .submit(Action::Create, tile)
            .await
            .unwrap();
        assert_eq!(outcome.delivered, 4);
        assert_eq!(outcome.acknowledged.len(), 4);
        shutdown.cancel();
    }

    let (_journal, client, _shutdown) = start(&dir).await;
    for key in fan_out_keys(&tile) {
        let state = client.state(&key).await.unwrap();
        assert_eq!(state.selections().as_slice(), &[tile], "selections of {}", key);
    }
}

#[tokio::test]
async fn test_device_status_survives_restart() {
    let dir = TempDir::new().unwrap();
    let device = tile_at(MAX_ZOOM, LatLng::new(51.5, -0.12)).unwrap();
    let key = key_of(&device);

    {
        let (_journal, client, shutdown) = start(&dir).await;
        assert_eq!(client.state(&key).await.unwrap().status(), Status::Happy);
        SelectionDriver::new(client)
            .submit(Action::Sad, device)
            .await
            .unwrap();
        shutdown.cancel();
    }

    let (_journal, client, _shutdown) = start(&dir).await;
    assert_eq!(client.state(&key).await.unwrap().status(), Status::Sad);

    // Sad again keeps the device sad
    let driver = SelectionDriver::new(client.clone());
    driver.submit(Action::Sad, device).await.unwrap();
    assert_eq!(client.state(&key).await.unwrap().status(), Status::Sad);

    driver.submit(Action::Happy, device).await.unwrap();
    assert_eq!(client.state(&key).await.unwrap().status(), Status::Happy);
}

// =============================================================================
// Merge rules through the runtime
// =============================================================================

#[tokio::test]
async fn test_parent_create_covers_child_create() {
    let dir = TempDir::new().unwrap();
    let (journal, client, _shutdown) = start(&dir).await;

    let parent = zoom3_tile();
    let tile = subdivide(&parent)[2];
    let inner = subdivide(&tile)[1];
    let key = key_of(&tile);

    let inner_ack = client
        .ask(&key, Selection::new(Action::Create, inner))
        .await
        .unwrap();
    assert!(inner_ack.is_some());

    let parent_ack = client
        .ask(&key, Selection::new(Action::Create, parent))
        .await
        .unwrap();
    assert!(parent_ack.is_some());
    assert_eq!(client.state(&key).await.unwrap().selections().as_slice(), &[parent]);

    let covered = client
        .ask(&key, Selection::new(Action::Create, inner))
        .await
        .unwrap();
    assert!(covered.is_none());

    let events = journal.replay(&persistence_id(&key)).await.unwrap();
    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn test_delete_of_area_clears_fanned_out_selections() {
    let dir = TempDir::new().unwrap();
    let (_journal, client, _shutdown) = start(&dir).await;
    let driver = SelectionDriver::new(client.clone());

    let tile = zoom3_tile();
    let children = subdivide(&tile);
    driver.submit(Action::Create, children[0]).await.unwrap();
    driver.submit(Action::Create, children[3]).await.unwrap();

    let root_key = key_of(&root());
    assert_eq!(client.state(&root_key).await.unwrap().selections().len(), 2);

    driver.submit(Action::Delete, tile).await.unwrap();
    for key in fan_out_keys(&tile) {
        assert!(client.state(&key).await.unwrap().selections().is_empty());
    }

    // Finer tiles are not part of the delete fan-out
    let child = client.state(&key_of(&children[0])).await.unwrap();
    assert_eq!(child.selections().as_slice(), &[children[0]]);
}

// =============================================================================
// Replay and tags
// =============================================================================

#[tokio::test]
async fn test_replay_matches_live_state() {
    let dir = TempDir::new().unwrap();
    let (journal, client, _shutdown) = start(&dir).await;
    let driver = SelectionDriver::new(client.clone());

    let area = Region::new(4, LatLng::new(15.0, -15.0), LatLng::new(5.0, 5.0)).unwrap();
    let targets = tiles_intersecting(&area);
    let steps = [
        (Action::Create, targets[0]),
        (Action::Create, targets[4]),
        (Action::Delete, targets[0]),
        (Action::Create, subdivide(&targets[5])[3]),
        (Action::Create, targets[5]),
        (Action::Delete, subdivide(&targets[4])[0]),
    ];
    for (action, region) in steps {
        driver.submit(action, region).await.unwrap();
    }

    let mut keys: HashSet<String> = HashSet::new();
    for (_, region) in steps {
        keys.extend(fan_out_keys(&region));
    }
    for key in keys {
        let live = client.state(&key).await.unwrap();
        let events = journal.replay(&persistence_id(&key)).await.unwrap();
        let replayed = RegionState::replay(region_of(&key).unwrap(), &events);
        assert_eq!(live, replayed, "state of {}", key);
    }
}

#[tokio::test]
async fn test_tags_cover_every_event() {
    let dir = TempDir::new().unwrap();
    let (journal, client, _shutdown) = start(&dir).await;
    let driver = SelectionDriver::new(client);

    let mut acknowledged = 0;
    for tile in subdivide(&zoom3_tile()) {
        acknowledged += driver
            .submit(Action::Create, tile)
            .await
            .unwrap()
            .acknowledged
            .len();
    }

    let mut tagged = 0;
    for shard in 0..SHARDS {
        let tag = format!("region-{}", shard);
        for record in journal.events_by_tag(&tag).await.unwrap() {
            let entity_id = record
                .persistence_id
                .strip_prefix(&format!("{}|", ENTITY_TYPE))
                .unwrap();
            assert_eq!(tag_for(entity_id, SHARDS), tag);
            tagged += 1;
        }
    }
    assert_eq!(tagged, acknowledged);
}
