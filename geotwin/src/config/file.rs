//! Locating, reading and writing the GeoTwin configuration file.
//!
//! Everything GeoTwin keeps on disk lives under one home directory,
//! `~/.geotwin` unless `GEOTWIN_HOME` names another one. The config file is
//! `config.ini` inside it.

use ini::Ini;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;

/// Environment variable overriding the GeoTwin home directory.
pub const HOME_ENV: &str = "GEOTWIN_HOME";

const HOME_DIR_NAME: &str = ".geotwin";
const CONFIG_FILE_NAME: &str = "config.ini";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Malformed INI in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: ini::ParseError,
    },

    #[error("Cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// A key is present but its value is unusable
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFile {
    /// Loads `config.ini` from the GeoTwin home, or defaults if there is none.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Loads a config file, falling back to defaults when it is missing.
    ///
    /// Keys absent from the file keep their default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigFileError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let ini = Ini::load_from_str(&content).map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        super::parser::parse_ini(&ini)
    }

    /// Writes the config, creating parent directories.
    ///
    /// The content goes to a sibling temp file first and is renamed into
    /// place, so readers never see a half-written file.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        let write_error = |source| ConfigFileError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let staging = path.with_extension("ini.tmp");
        std::fs::write(&staging, super::writer::to_config_string(self)).map_err(write_error)?;
        std::fs::rename(&staging, path).map_err(write_error)
    }

    /// Writes a default config file to the GeoTwin home unless one exists.
    ///
    /// Returns the file's path and whether it was created.
    pub fn ensure_exists() -> Result<(PathBuf, bool), ConfigFileError> {
        let path = config_file_path();
        let created = Self::create_default_at(&path)?;
        Ok((path, created))
    }

    fn create_default_at(path: &Path) -> Result<bool, ConfigFileError> {
        if path.exists() {
            return Ok(false);
        }
        Self::default().save_to(path)?;
        Ok(true)
    }
}

/// The GeoTwin home directory holding config, journal and log.
pub fn config_directory() -> PathBuf {
    resolve_home(std::env::var_os(HOME_ENV), dirs::home_dir())
}

/// Path of `config.ini` in the GeoTwin home.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

fn resolve_home(override_dir: Option<OsString>, user_home: Option<PathBuf>) -> PathBuf {
    match override_dir.filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => user_home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HOME_DIR_NAME),
    }
}
