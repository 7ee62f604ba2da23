//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Sharding tag settings
    pub sharding: ShardingSettings,
    /// Entity lifecycle settings
    pub entity: EntitySettings,
    /// Event journal settings
    pub journal: JournalSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Sharding configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardingSettings {
    /// Number of distinct `region-{n}` tags. Changing it retags new events
    /// only; events already journalled keep their tag.
    pub number_of_shards: u32,
}

/// Entity configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySettings {
    /// Seconds without a command before an entity passivates. 0 disables.
    pub passivate_after_secs: u64,
}

/// Journal configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalSettings {
    /// Directory holding `events.jsonl`
    pub directory: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
