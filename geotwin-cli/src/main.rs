//! GeoTwin CLI - Command-line interface
//!
//! This binary provides a command-line interface to the GeoTwin library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};
use geotwin::entity::Action;

use commands::config::ConfigCommands;
use commands::select::SelectArgs;

#[derive(Parser)]
#[command(name = "geotwin")]
#[command(version = geotwin::VERSION)]
#[command(about = "Event-sourced digital twin of the world tile grid", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the key and sharding tag of the tile containing a point
    Key {
        /// Zoom level (0-18)
        #[arg(long)]
        zoom: u8,

        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },

    /// Print the fields of a tile key
    Decode {
        /// Canonical tile key (zoom:top:left:bottom:right)
        key: String,
    },

    /// List the keys of every tile overlapping an area
    Tiles {
        /// Zoom level of the tiles to list
        #[arg(long)]
        zoom: u8,

        /// Northern edge latitude
        #[arg(long, allow_negative_numbers = true)]
        top: f64,

        /// Western edge longitude
        #[arg(long, allow_negative_numbers = true)]
        left: f64,

        /// Southern edge latitude
        #[arg(long, allow_negative_numbers = true)]
        bottom: f64,

        /// Eastern edge longitude
        #[arg(long, allow_negative_numbers = true)]
        right: f64,
    },

    /// Apply a selection to the tile containing a point and all its ancestors
    Select {
        /// One of: create, delete, happy, sad
        action: Action,

        /// Zoom level of the selected tile
        #[arg(long)]
        zoom: u8,

        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },

    /// Replay a tile's history and print its state
    State {
        /// Canonical tile key
        key: String,
    },

    /// List journal records carrying a sharding tag
    Events {
        /// Sharding tag, e.g. region-42
        #[arg(long)]
        tag: String,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Key { zoom, lat, lng } => commands::grid::run_key(zoom, lat, lng),
        Commands::Decode { key } => commands::grid::run_decode(&key),
        Commands::Tiles {
            zoom,
            top,
            left,
            bottom,
            right,
        } => commands::grid::run_tiles(zoom, top, left, bottom, right),
        Commands::Select {
            action,
            zoom,
            lat,
            lng,
        } => commands::select::run(SelectArgs {
            action,
            zoom,
            lat,
            lng,
        }),
        Commands::State { key } => commands::state::run(&key),
        Commands::Events { tag } => commands::events::run(&tag),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
