//! GeoTwin - an event-sourced digital twin of the world tile grid
//!
//! The globe is partitioned into a fixed hierarchy of rectangular tiles
//! ([`grid`]). Every tile is an independent, persistent entity ([`entity`])
//! that records which parts of it users have selected and, for the finest
//! device tiles, whether the device is happy or sad.
//!
//! # High-Level API
//!
//! ```ignore
//! use geotwin::driver::SelectionDriver;
//! use geotwin::entity::Action;
//! use geotwin::journal::FileJournal;
//! use geotwin::shard::{RegionShards, ShardSettings};
//!
//! let journal = Arc::new(FileJournal::open("journal").await?);
//! let client = RegionShards::start(journal, ShardSettings::default(), shutdown);
//! let outcome = SelectionDriver::new(client).submit(Action::Create, area).await?;
//! ```

pub mod config;
pub mod driver;
pub mod entity;
pub mod grid;
pub mod journal;
pub mod logging;
pub mod shard;

/// Version of the GeoTwin library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
