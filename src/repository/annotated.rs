//! Output of the hard-negative annotator (JSON Lines).

use std::path::{Path, PathBuf};

use crate::models::AnnotatedHardNegatives;

use super::{write_atomic, RepositoryError, RepositoryResult};

#[derive(Debug, Clone)]
pub struct AnnotatedRepository {
    path: PathBuf,
    rows: Vec<AnnotatedHardNegatives>,
}

impl AnnotatedRepository {
    /// Output path derived from the store path: `data/x.json` -> `data/x_annotated.jsonl`.
    pub fn path_for_store(store: &Path) -> PathBuf {
        let stem = store
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "annotations".to_string());
        store.with_file_name(format!("{}_annotated.jsonl", stem))
    }

    pub fn load_or_default(path: &Path) -> RepositoryResult<Self> {
        let mut rows = Vec::new();
        if path.exists() {
            let contents =
                std::fs::read_to_string(path).map_err(|e| RepositoryError::io(path, e))?;
            for (idx, line) in contents.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let row = serde_json::from_str(line).map_err(|source| RepositoryError::Json {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    source,
                })?;
                rows.push(row);
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> &[AnnotatedHardNegatives] {
        &self.rows
    }

    /// Replace the row with the same `text_id`, or append.
    pub fn upsert(&mut self, row: AnnotatedHardNegatives) {
        match self.rows.iter_mut().find(|r| r.text_id == row.text_id) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    pub fn save(&self) -> RepositoryResult<()> {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&serde_json::to_string(row)?);
            out.push('\n');
        }
        write_atomic(&self.path, out.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_store() {
        assert_eq!(
            AnnotatedRepository::path_for_store(Path::new("data/clean_dataset.json")),
            PathBuf::from("data/clean_dataset_annotated.jsonl")
        );
    }

    #[test]
    fn test_upsert_by_text_id() {
        let mut repo = AnnotatedRepository {
            path: PathBuf::from("unused.jsonl"),
            rows: Vec::new(),
        };
        let row = |hn: &str| AnnotatedHardNegatives {
            text_id: "t1".into(),
            text: "x".into(),
            topics: vec![],
            hard_negatives: vec![hn.into()],
        };
        repo.upsert(row("a"));
        repo.upsert(row("b"));
        assert_eq!(repo.rows().len(), 1);
        assert_eq!(repo.rows()[0].hard_negatives, vec!["b"]);
    }
}
