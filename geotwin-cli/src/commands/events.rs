//! Events command - list journal records carrying a sharding tag.

use geotwin::entity::TAG_PREFIX;
use geotwin::journal::EventJournal;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the events command.
pub fn run(tag: &str) -> Result<(), CliError> {
    if !tag.starts_with(TAG_PREFIX) {
        return Err(CliError::Config(format!(
            "Tags have the form {}N, got '{}'",
            TAG_PREFIX, tag
        )));
    }

    let runner = CliRunner::new()?;
    runner.log_startup("events");

    let records = runner.block_on(async {
        let journal = runner.open_journal().await?;
        journal.events_by_tag(tag).await.map_err(CliError::from)
    })?;

    for record in &records {
        println!(
            "{:>6}  {}  {}",
            record.sequence_nr, record.persistence_id, record.event
        );
    }
    println!("{} event(s) tagged {}", records.len(), tag);
    Ok(())
}
