//! The candidate record stream (JSON Lines).

use std::path::{Path, PathBuf};

use crate::models::{CandidateRecord, RecordStatus};

use super::{write_atomic, RepositoryError, RepositoryResult};

/// All candidate records of one input file, in file order.
#[derive(Debug, Clone)]
pub struct RecordStream {
    path: PathBuf,
    records: Vec<CandidateRecord>,
}

impl RecordStream {
    /// Load a JSON Lines file. Blank lines are ignored.
    pub fn load(path: &Path) -> RepositoryResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| RepositoryError::io(path, e))?;
        let records = Self::parse(path, &contents)?;
        tracing::info!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    fn parse(path: &Path, contents: &str) -> RepositoryResult<Vec<CandidateRecord>> {
        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| RepositoryError::Json {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    source,
                })
            })
            .collect()
    }

    /// Create an in-memory stream bound to `path` (nothing is written yet).
    pub fn from_records(path: impl Into<PathBuf>, records: Vec<CandidateRecord>) -> Self {
        Self {
            path: path.into(),
            records,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[CandidateRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [CandidateRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CandidateRecord> {
        self.records.get(index)
    }

    /// Update the status of the record at `index`.
    pub fn set_status(&mut self, index: usize, status: RecordStatus) {
        if let Some(record) = self.records.get_mut(index) {
            record.status = status;
        }
    }

    /// Number of records currently in `status`.
    pub fn count_status(&self, status: RecordStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// Rewrite the whole file.
    pub fn save(&self) -> RepositoryResult<()> {
        let mut out = String::new();
        for record in &self.records {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        write_atomic(&self.path, out.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Candidate;
    use tempfile::tempdir;

    #[test]
    fn test_load_save_preserves_order_and_status() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        std::fs::write(
            &path,
            concat!(
                r#"{"text_id":"b","text":"second","scores":[{"topic":"x","similarity":0.2}]}"#,
                "\n\n",
                r#"{"text_id":"a","text":"first","scores":[],"state":2}"#,
                "\n"
            ),
        )
        .unwrap();

        let mut stream = RecordStream::load(&path).unwrap();
        assert_eq!(stream.len(), 2);
        stream.set_status(0, RecordStatus::Skipped);
        stream.save().unwrap();

        let reloaded = RecordStream::load(&path).unwrap();
        let ids: Vec<_> = reloaded.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(reloaded.records()[0].status, RecordStatus::Skipped);
        assert_eq!(reloaded.records()[1].status, RecordStatus::Checked);
        assert_eq!(reloaded.records()[0].candidates, vec![Candidate::new("x", 0.2)]);
    }

    #[test]
    fn test_invalid_line_reports_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        std::fs::write(&path, "{\"text_id\":\"a\",\"text\":\"x\"}\nnot json\n").unwrap();

        match RecordStream::load(&path) {
            Err(RepositoryError::Json { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected JSON error, got {:?}", other),
        }
    }

    #[test]
    fn test_count_status() {
        let stream = RecordStream::from_records(
            "unused.jsonl",
            vec![
                CandidateRecord::new("a", "x", vec![]),
                CandidateRecord {
                    status: RecordStatus::Checked,
                    ..CandidateRecord::new("b", "y", vec![])
                },
            ],
        );
        assert_eq!(stream.count_status(RecordStatus::NotVisited), 1);
        assert_eq!(stream.count_status(RecordStatus::Checked), 1);
        assert_eq!(stream.count_status(RecordStatus::Skipped), 0);
    }
}
