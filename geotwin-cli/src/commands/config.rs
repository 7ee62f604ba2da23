//! Configuration CLI commands.
//!
//! Provides `config path`, `config show` and `config init` for managing
//! the configuration file from the command line.

use clap::Subcommand;
use geotwin::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration, defaults included
    Show,

    /// Write a default configuration file if none exists
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => run_show(),
        ConfigCommands::Init => run_init(),
    }
}

fn run_path() -> Result<(), CliError> {
    let path = config_file_path();
    println!("{}", path.display());
    if !path.exists() {
        println!("(file does not exist, defaults are in effect)");
    }
    Ok(())
}

fn run_show() -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    println!("[sharding]");
    println!("number_of_shards = {}", config.sharding.number_of_shards);
    println!();
    println!("[entity]");
    println!("passivate_after_secs = {}", config.entity.passivate_after_secs);
    println!();
    println!("[journal]");
    println!("directory = {}", config.journal.directory.display());
    println!();
    println!("[logging]");
    println!("file = {}", config.logging.file.display());
    Ok(())
}

fn run_init() -> Result<(), CliError> {
    let (path, created) = ConfigFile::ensure_exists()?;
    if created {
        println!("Created {}", path.display());
    } else {
        println!("{} already exists, left unchanged", path.display());
    }
    Ok(())
}
