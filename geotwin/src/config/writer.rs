//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[sharding]
; Number of sharding tags (region-0 .. region-N-1) events are spread over.
; Changing this only affects events persisted afterwards.
number_of_shards = {}

[entity]
; Seconds a tile entity may stay idle before it is passivated.
; It is replayed from the journal on its next command. 0 disables passivation.
passivate_after_secs = {}

[journal]
; Directory holding the append-only event journal (events.jsonl)
directory = {}

[logging]
; Log file, cleared at the start of every run
file = {}
"#,
        config.sharding.number_of_shards,
        config.entity.passivate_after_secs,
        path_to_string(&config.journal.directory),
        path_to_string(&config.logging.file),
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
