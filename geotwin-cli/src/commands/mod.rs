//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`grid`] - Key, decode and tile enumeration (no journal access)
//! - [`select`] - Fan a selection out through the shard runtime
//! - [`state`] - Replay and print one tile's state
//! - [`events`] - List journal records by sharding tag
//! - [`config`] - Configuration inspection (path, show, init)

pub mod config;
pub mod events;
pub mod grid;
pub mod select;
pub mod state;
