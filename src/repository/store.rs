//! The durable annotation store: `text_id -> AnnotationOutcome`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::AnnotationOutcome;

use super::{write_atomic, RepositoryError, RepositoryResult};

#[derive(Debug, Clone)]
pub struct AnnotationStore {
    path: PathBuf,
    entries: BTreeMap<String, AnnotationOutcome>,
}

impl AnnotationStore {
    /// Load the store, or start empty when the file does not exist yet.
    pub fn load_or_default(path: &Path) -> RepositoryResult<Self> {
        if !path.exists() {
            tracing::info!("No annotation store at {}, starting empty", path.display());
            return Ok(Self::empty(path));
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> RepositoryResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| RepositoryError::io(path, e))?;
        let mut entries: BTreeMap<String, AnnotationOutcome> = if contents.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&contents).map_err(|source| RepositoryError::Json {
                path: path.to_path_buf(),
                line: source.line(),
                source,
            })?
        };
        for (key, outcome) in entries.iter_mut() {
            if outcome.text_id.is_empty() {
                outcome.text_id = key.clone();
            }
        }
        tracing::info!("Loaded {} annotations from {}", entries.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, text_id: &str) -> bool {
        self.entries.contains_key(text_id)
    }

    pub fn get(&self, text_id: &str) -> Option<&AnnotationOutcome> {
        self.entries.get(text_id)
    }

    pub fn get_mut(&mut self, text_id: &str) -> Option<&mut AnnotationOutcome> {
        self.entries.get_mut(text_id)
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &AnnotationOutcome> {
        self.entries.values()
    }

    /// Insert or replace the outcome for its `text_id`.
    pub fn upsert(&mut self, outcome: AnnotationOutcome) {
        self.entries.insert(outcome.text_id.clone(), outcome);
    }

    /// Rewrite the whole store.
    pub fn save(&self) -> RepositoryResult<()> {
        let mut json = serde_json::to_string_pretty(&self.entries)?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes())
    }
}
