//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use geotwin::config::ConfigFileError;
use geotwin::entity::EntityError;
use geotwin::grid::GridError;
use geotwin::journal::JournalError;
use geotwin::shard::ShardError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// A key, coordinate or area did not describe a tile
    Grid(GridError),
    /// Failed to read or write the event journal
    Journal(JournalError),
    /// The shard runtime rejected or dropped a request
    Shard(ShardError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Grid(GridError::KeyFormat { .. }) => {
                eprintln!();
                eprintln!("Keys have the form zoom:top:left:bottom:right with 13 decimals,");
                eprintln!("for example: geotwin key --zoom 3 --lat 12.5 --lng 34.5");
            }
            CliError::Journal(JournalError::Corrupt { .. }) => {
                eprintln!();
                eprintln!("The journal file has a damaged record. Restore it from a backup");
                eprintln!("or move it aside to start with an empty history.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::Grid(e) => write!(f, "{}", e),
            CliError::Journal(e) => write!(f, "{}", e),
            CliError::Shard(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Grid(e) => Some(e),
            CliError::Journal(e) => Some(e),
            CliError::Shard(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<GridError> for CliError {
    fn from(e: GridError) -> Self {
        CliError::Grid(e)
    }
}

impl From<EntityError> for CliError {
    fn from(e: EntityError) -> Self {
        match e {
            EntityError::Grid(e) => CliError::Grid(e),
            EntityError::Journal(e) => CliError::Journal(e),
        }
    }
}

impl From<JournalError> for CliError {
    fn from(e: JournalError) -> Self {
        CliError::Journal(e)
    }
}

impl From<ShardError> for CliError {
    fn from(e: ShardError) -> Self {
        match e {
            ShardError::Grid(e) => CliError::Grid(e),
            other => CliError::Shard(other),
        }
    }
}
