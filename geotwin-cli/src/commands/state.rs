//! State command - replay one tile's history and print its state.

use geotwin::entity::RegionEntity;
use geotwin::grid::key_of;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the state command.
pub fn run(key: &str) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("state");
    let number_of_shards = runner.config().sharding.number_of_shards;

    let entity = runner.block_on(async {
        let journal = runner.open_journal().await?;
        RegionEntity::activate(key, journal, number_of_shards)
            .await
            .map_err(CliError::from)
    })?;

    let state = entity.state();
    println!("Tile:       {}", state.region());
    println!("Tag:        {}", entity.tag());
    println!("Status:     {}", state.status());
    println!("Selections: {}", state.selections().len());
    for selection in state.selections().as_slice() {
        println!("  {}", key_of(selection));
    }
    Ok(())
}
