//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::file::config_directory;
use super::settings::*;

/// Default number of sharding tags.
pub const DEFAULT_NUMBER_OF_SHARDS: u32 = 100;

/// Default idle time before an entity passivates (2 minutes).
pub const DEFAULT_PASSIVATE_AFTER_SECS: u64 = 120;

/// Journal directory name under the config directory.
pub const DEFAULT_JOURNAL_DIR_NAME: &str = "journal";

/// Log file name under the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "geotwin.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = config_directory();

        Self {
            sharding: ShardingSettings {
                number_of_shards: DEFAULT_NUMBER_OF_SHARDS,
            },
            entity: EntitySettings {
                passivate_after_secs: DEFAULT_PASSIVATE_AFTER_SECS,
            },
            journal: JournalSettings {
                directory: config_dir.join(DEFAULT_JOURNAL_DIR_NAME),
            },
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
