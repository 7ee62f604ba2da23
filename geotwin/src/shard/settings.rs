//! Runtime settings for the shard coordinator.

use std::time::Duration;

use crate::config::ConfigFile;

/// Settings shared by the coordinator and every entity it spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardSettings {
    /// Modulus of the sharding tag hash
    pub number_of_shards: u32,
    /// Idle time after which an entity stops; `None` keeps entities alive
    pub passivate_after: Option<Duration>,
}

impl Default for ShardSettings {
    fn default() -> Self {
        Self::from(&ConfigFile::default())
    }
}

impl From<&ConfigFile> for ShardSettings {
    fn from(config: &ConfigFile) -> Self {
        let secs = config.entity.passivate_after_secs;
        Self {
            number_of_shards: config.sharding.number_of_shards.max(1),
            passivate_after: (secs > 0).then(|| Duration::from_secs(secs)),
        }
    }
}
