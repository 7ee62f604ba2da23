//! Append-only JSON-lines journal on local disk.
//!
//! All records live in a single `events.jsonl` file, one JSON object per
//! line. The file is read once on open and kept in memory for replay and tag
//! queries; appends go through an async mutex so writes never interleave.
//!
//! # Durability
//!
//! `persist` returns only after the line has been written and `sync_data`
//! has completed. A write that fails half way is truncated away, and a torn
//! final line left by a crash is dropped the next time the journal opens. If
//! the truncation itself fails the journal stops accepting writes, since the
//! file may now end in a partial line.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::r#trait::{EventJournal, JournalError, JournalFuture, JournalRecord};
use crate::entity::SelectionAccepted;

/// File name of the journal inside its directory.
pub const JOURNAL_FILE: &str = "events.jsonl";

/// Journal backed by a JSON-lines file.
pub struct FileJournal {
    path: PathBuf,
    inner: Mutex<FileJournalInner>,
}

struct FileJournalInner {
    file: File,
    /// Length of the file up to the last complete record
    len: u64,
    records: Vec<JournalRecord>,
    sequence_nrs: HashMap<String, u64>,
    /// Set once a rollback fails; later appends are refused
    poisoned: Option<String>,
}

impl FileJournal {
    /// Opens the journal in `directory`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Io`] if the directory or file cannot be
    /// accessed, and [`JournalError::Corrupt`] if a complete line does not
    /// decode as a record.
    pub async fn open(directory: impl AsRef<Path>) -> Result<Self, JournalError> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory).await?;
        let path = directory.join(JOURNAL_FILE);

        let contents = match fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let (records, valid_len) = parse_records(&contents)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        if valid_len < contents.len() {
            warn!(
                path = %path.display(),
                dropped_bytes = contents.len() - valid_len,
                "Dropping torn final journal line"
            );
            file.set_len(valid_len as u64).await?;
        }

        let mut sequence_nrs = HashMap::new();
        for record in &records {
            sequence_nrs.insert(record.persistence_id.clone(), record.sequence_nr);
        }
        debug!(path = %path.display(), records = records.len(), "Journal opened");

        Ok(Self {
            path,
            inner: Mutex::new(FileJournalInner {
                file,
                len: valid_len as u64,
                records,
                sequence_nrs,
                poisoned: None,
            }),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(file: &mut File, bytes: &[u8]) -> io::Result<()> {
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_data().await
    }
}

/// Decodes complete lines, returning the records and the byte length they span.
fn parse_records(contents: &str) -> Result<(Vec<JournalRecord>, usize), JournalError> {
    let mut records = Vec::new();
    let mut valid_len = 0;
    for (index, line) in contents.split_inclusive('\n').enumerate() {
        if !line.ends_with('\n') {
            break;
        }
        let trimmed = line.trim_end();
        if !trimmed.is_empty() {
            let record = serde_json::from_str(trimmed).map_err(|e| JournalError::Corrupt {
                line: index + 1,
                reason: e.to_string(),
            })?;
            records.push(record);
        }
        valid_len += line.len();
    }
    Ok((records, valid_len))
}

impl EventJournal for FileJournal {
    fn persist<'a>(
        &'a self,
        persistence_id: &'a str,
        tag: &'a str,
        event: &'a SelectionAccepted,
    ) -> JournalFuture<'a, u64> {
        Box::pin(async move {
            let mut inner = self.inner.lock().await;
            if let Some(reason) = &inner.poisoned {
                return Err(JournalError::Poisoned(reason.clone()));
            }
            let sequence_nr = inner.sequence_nrs.get(persistence_id).copied().unwrap_or(0) + 1;
            let record = JournalRecord {
                persistence_id: persistence_id.to_string(),
                sequence_nr,
                tag: tag.to_string(),
                event: *event,
            };
            let mut line = serde_json::to_string(&record)?;
            line.push('\n');

            if let Err(e) = Self::append(&mut inner.file, line.as_bytes()).await {
                let len = inner.len;
                // Roll back a partial line so later appends stay decodable
                if let Err(rollback) = inner.file.set_len(len).await {
                    warn!(
                        path = %self.path.display(),
                        error = %rollback,
                        "Journal rollback failed, refusing further writes"
                    );
                    inner.poisoned = Some(format!(
                        "truncating {} to {} bytes failed: {}",
                        self.path.display(),
                        len,
                        rollback
                    ));
                }
                return Err(e.into());
            }

            inner.len += line.len() as u64;
            inner
                .sequence_nrs
                .insert(persistence_id.to_string(), sequence_nr);
            inner.records.push(record);
            Ok(sequence_nr)
        })
    }

    fn replay<'a>(&'a self, persistence_id: &'a str) -> JournalFuture<'a, Vec<SelectionAccepted>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            Ok(inner
                .records
                .iter()
                .filter(|r| r.persistence_id == persistence_id)
                .map(|r| r.event)
                .collect())
        })
    }

    fn events_by_tag<'a>(&'a self, tag: &'a str) -> JournalFuture<'a, Vec<JournalRecord>> {
        Box::pin(async move {
            let inner = self.inner.lock().await;
            Ok(inner
                .records
                .iter()
                .filter(|r| r.tag == tag)
                .cloned()
                .collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Action;
    use crate::grid::{root, subdivide};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("journal");

        let journal = FileJournal::open(&dir).await.unwrap();
        assert!(dir.exists());
        assert_eq!(journal.path(), dir.join(JOURNAL_FILE));
        assert!(journal.replay("anything").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let halves = subdivide(&root());
        let first = SelectionAccepted::new(Action::Create, halves[0]);
        let second = SelectionAccepted::new(Action::Delete, halves[1]);

        {
            let journal = FileJournal::open(temp_dir.path()).await.unwrap();
            assert_eq!(journal.persist("a", "region-3", &first).await.unwrap(), 1);
            assert_eq!(journal.persist("b", "region-4", &first).await.unwrap(), 1);
            assert_eq!(journal.persist("a", "region-3", &second).await.unwrap(), 2);
        }

        let journal = FileJournal::open(temp_dir.path()).await.unwrap();
        assert_eq!(journal.replay("a").await.unwrap(), vec![first, second]);
        assert_eq!(journal.replay("b").await.unwrap(), vec![first]);

        // Sequence numbers continue after reopening
        assert_eq!(journal.persist("a", "region-3", &first).await.unwrap(), 3);

        let tagged = journal.events_by_tag("region-3").await.unwrap();
        let sequence: Vec<u64> = tagged.iter().map(|r| r.sequence_nr).collect();
        assert_eq!(sequence, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_torn_final_line_is_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let event = SelectionAccepted::new(Action::Happy, root());
        {
            let journal = FileJournal::open(temp_dir.path()).await.unwrap();
            journal.persist("a", "t", &event).await.unwrap();
        }
        let path = temp_dir.path().join(JOURNAL_FILE);
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str(r#"{"persistence_id":"a","seq"#);
        std::fs::write(&path, contents).unwrap();

        let journal = FileJournal::open(temp_dir.path()).await.unwrap();
        assert_eq!(journal.replay("a").await.unwrap(), vec![event]);
        journal.persist("a", "t", &event).await.unwrap();

        let reopened = FileJournal::open(temp_dir.path()).await.unwrap();
        assert_eq!(reopened.replay("a").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_line_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(JOURNAL_FILE), "not json\n").unwrap();

        let result = FileJournal::open(temp_dir.path()).await;
        assert!(matches!(result, Err(JournalError::Corrupt { line: 1, .. })));
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let event = SelectionAccepted::new(Action::Sad, root());
        let record = JournalRecord {
            persistence_id: "a".to_string(),
            sequence_nr: 1,
            tag: "t".to_string(),
            event,
        };
        let line = serde_json::to_string(&record).unwrap();
        std::fs::write(temp_dir.path().join(JOURNAL_FILE), format!("\n{}\n\n", line)).unwrap();

        let journal = FileJournal::open(temp_dir.path()).await.unwrap();
        assert_eq!(journal.replay("a").await.unwrap(), vec![event]);
    }

    #[tokio::test]
    async fn test_failed_rollback_refuses_further_writes() {
        let temp_dir = TempDir::new().unwrap();
        let event = SelectionAccepted::new(Action::Create, root());
        let journal = FileJournal::open(temp_dir.path()).await.unwrap();
        journal.persist("a", "t", &event).await.unwrap();

        // A read-only handle fails both the append and the truncate
        let read_only = File::open(journal.path()).await.unwrap();
        journal.inner.lock().await.file = read_only;

        let first = journal.persist("a", "t", &event).await;
        assert!(matches!(first, Err(JournalError::Io(_))));

        let second = journal.persist("b", "t", &event).await;
        assert!(matches!(second, Err(JournalError::Poisoned(_))));

        // Reads still see exactly the committed history
        assert_eq!(journal.replay("a").await.unwrap(), vec![event]);
        assert!(journal.replay("b").await.unwrap().is_empty());
        drop(journal);

        let reopened = FileJournal::open(temp_dir.path()).await.unwrap();
        assert_eq!(reopened.replay("a").await.unwrap(), vec![event]);
    }
}
