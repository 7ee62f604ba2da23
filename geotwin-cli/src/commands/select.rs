//! Select command - fan a selection out to every tile it concerns.

use tokio_util::sync::CancellationToken;
use tracing::info;

use geotwin::driver::SelectionDriver;
use geotwin::entity::Action;
use geotwin::grid::key_of;
use geotwin::shard::{RegionShards, ShardSettings};

use super::grid::resolve_tile;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the select command.
pub struct SelectArgs {
    pub action: Action,
    pub zoom: u8,
    pub lat: f64,
    pub lng: f64,
}

/// Run the select command.
pub fn run(args: SelectArgs) -> Result<(), CliError> {
    let area = resolve_tile(args.zoom, args.lat, args.lng)?;

    let runner = CliRunner::new()?;
    runner.log_startup("select");
    let settings = ShardSettings::from(runner.config());

    let outcome = runner.block_on(async {
        let journal = runner.open_journal().await?;
        let shutdown = CancellationToken::new();
        let client = RegionShards::start(journal, settings, shutdown.clone());

        let result = SelectionDriver::new(client).submit(args.action, area).await;
        shutdown.cancel();
        result.map_err(CliError::from)
    })?;

    info!(
        delivered = outcome.delivered,
        acknowledged = outcome.acknowledged.len(),
        "Select finished"
    );
    println!("Selection:    {} {}", args.action, key_of(&area));
    println!("Delivered:    {}", outcome.delivered);
    println!("Acknowledged: {}", outcome.acknowledged.len());
    for key in &outcome.acknowledged {
        println!("  {}", key);
    }
    Ok(())
}
