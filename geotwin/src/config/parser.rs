//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [sharding] section
    if let Some(section) = ini.section(Some("sharding")) {
        if let Some(v) = section.get("number_of_shards") {
            config.sharding.number_of_shards = v
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "sharding".to_string(),
                    key: "number_of_shards".to_string(),
                    value: v.to_string(),
                    reason: "must be a positive integer".to_string(),
                })?;
        }
    }

    // [entity] section
    if let Some(section) = ini.section(Some("entity")) {
        if let Some(v) = section.get("passivate_after_secs") {
            config.entity.passivate_after_secs =
                v.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "entity".to_string(),
                    key: "passivate_after_secs".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative integer (seconds, 0 disables)".to_string(),
                })?;
        }
    }

    // [journal] section
    if let Some(section) = ini.section(Some("journal")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.journal.directory = expand_tilde(v);
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
