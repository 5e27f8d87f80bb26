//! Commit point of the cleaning session.

use crate::models::{AnnotationOutcome, RecordStatus};

use super::{AnnotationStore, RecordStream, RepositoryResult};

/// Terminal decision for one record.
#[derive(Debug, Clone)]
pub enum Commit {
    Checked(AnnotationOutcome),
    Skipped,
}

/// Owns both files of a cleaning session and rewrites them together.
#[derive(Debug)]
pub struct PersistenceWriter {
    pub records: RecordStream,
    pub store: AnnotationStore,
}

impl PersistenceWriter {
    pub fn new(records: RecordStream, store: AnnotationStore) -> Self {
        Self { records, store }
    }

    /// Persist the decision for the record at `index`.
    ///
    /// The store is written before the record stream: a crash in between
    /// leaves the record re-reviewable instead of losing the outcome.
    pub fn commit(&mut self, index: usize, commit: Commit) -> RepositoryResult<()> {
        let status = match commit {
            Commit::Checked(outcome) => {
                self.store.upsert(outcome);
                self.store.save()?;
                RecordStatus::Checked
            }
            Commit::Skipped => RecordStatus::Skipped,
        };
        self.records.set_status(index, status);
        self.records.save()
    }

    /// Rewrite both files as they are.
    pub fn flush(&self) -> RepositoryResult<()> {
        self.store.save()?;
        self.records.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidateRecord;
    use tempfile::tempdir;

    #[test]
    fn test_skip_leaves_store_untouched() {
        let dir = tempdir().unwrap();
        let records = RecordStream::from_records(
            dir.path().join("records.jsonl"),
            vec![CandidateRecord::new("t1", "x", vec![])],
        );
        let store = AnnotationStore::empty(dir.path().join("store.json"));
        let mut writer = PersistenceWriter::new(records, store);

        writer.commit(0, Commit::Skipped).unwrap();

        assert!(!dir.path().join("store.json").exists());
        let reloaded = RecordStream::load(&dir.path().join("records.jsonl")).unwrap();
        assert_eq!(reloaded.records()[0].status, RecordStatus::Skipped);
    }

    #[test]
    fn test_checked_writes_both_files() {
        let dir = tempdir().unwrap();
        let records = RecordStream::from_records(
            dir.path().join("records.jsonl"),
            vec![CandidateRecord::new("t1", "x", vec![])],
        );
        let store = AnnotationStore::empty(dir.path().join("store.json"));
        let mut writer = PersistenceWriter::new(records, store);

        let outcome = AnnotationOutcome::from_review("t1", "x", &[], vec!["a".into()], &[]);
        writer.commit(0, Commit::Checked(outcome)).unwrap();

        let store = AnnotationStore::load(&dir.path().join("store.json")).unwrap();
        assert!(store.contains("t1"));
        let reloaded = RecordStream::load(&dir.path().join("records.jsonl")).unwrap();
        assert_eq!(reloaded.records()[0].status, RecordStatus::Checked);
    }
}
