//! User configuration.
//!
//! Settings are read from `config.ini` in the GeoTwin home (`~/.geotwin`, or
//! the directory named by `GEOTWIN_HOME`). Every key is optional; a
//! missing file or section falls back to the defaults in [`defaults`].
//!
//! ```ini
//! [sharding]
//! number_of_shards = 100
//!
//! [entity]
//! passivate_after_secs = 120
//!
//! [journal]
//! directory = ~/.geotwin/journal
//!
//! [logging]
//! file = ~/.geotwin/geotwin.log
//! ```

pub mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError, HOME_ENV};
pub use settings::{ConfigFile, EntitySettings, JournalSettings, LoggingSettings, ShardingSettings};
