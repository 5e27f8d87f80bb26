//! Merging hard-negative candidates onto the candidate record stream.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::models::{Candidate, CandidateRecord, HardNegative, HardNegativeKind};
use crate::repository::{RecordStream, RepositoryError, RepositoryResult};

/// Events emitted while merging.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeEvent {
    Started { total_records: usize },
    RecordMerged { text_id: String, merged: usize },
    /// Record already carries hard negatives and `force` is off.
    RecordKept { text_id: String },
    /// A source had nothing for this record.
    MissingSource { text_id: String, source: HardNegativeKind },
    Complete { merged: usize, kept: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    pub from_dataset: usize,
    pub from_api: usize,
    /// Rank dataset negatives by closeness to this similarity instead of
    /// by highest similarity.
    pub threshold: Option<f64>,
    /// Merge into records that already have hard negatives too.
    pub force: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            from_dataset: 2,
            from_api: 3,
            threshold: None,
            force: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResult {
    pub merged: usize,
    pub kept: usize,
    pub missing_dataset: usize,
    pub missing_generated: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DatasetEntry {
    #[serde(default)]
    potential_negatives_all: Vec<Candidate>,
}

/// Mined dataset negatives: `text_id -> {potential_negatives_all: [...]}`.
#[derive(Debug, Clone, Default)]
pub struct DatasetNegatives {
    entries: HashMap<String, DatasetEntry>,
}

impl DatasetNegatives {
    pub fn load(path: &Path) -> RepositoryResult<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| RepositoryError::io(path, e))?;
        let entries = serde_json::from_str(&contents).map_err(|source| RepositoryError::Json {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        })?;
        Ok(Self { entries })
    }

    pub fn from_candidates<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<Candidate>)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, potential_negatives_all)| (id, DatasetEntry { potential_negatives_all }))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best `take` negatives for a text, or `None` when the text is unknown.
    pub fn select(&self, text_id: &str, take: usize, threshold: Option<f64>) -> Option<Vec<String>> {
        let entry = self.entries.get(text_id)?;
        let mut ranked: Vec<&Candidate> = entry.potential_negatives_all.iter().collect();
        match threshold {
            Some(t) => ranked.sort_by(|a, b| {
                (a.similarity - t).abs().total_cmp(&(b.similarity - t).abs())
            }),
            None => ranked.sort_by(|a, b| b.similarity.total_cmp(&a.similarity)),
        }
        Some(ranked.into_iter().take(take).map(|c| c.topic.clone()).collect())
    }
}

pub struct MergeService {
    negatives: DatasetNegatives,
    options: MergeOptions,
}

impl MergeService {
    pub fn new(negatives: DatasetNegatives, options: MergeOptions) -> Self {
        Self { negatives, options }
    }

    /// Hard-negative candidates for one record.
    fn candidates_for(
        &self,
        record: &CandidateRecord,
        result: &mut MergeResult,
        on_event: &mut impl FnMut(MergeEvent),
    ) -> Vec<HardNegative> {
        let mut merged = Vec::new();

        match self
            .negatives
            .select(&record.id, self.options.from_dataset, self.options.threshold)
        {
            Some(topics) => merged.extend(
                topics
                    .into_iter()
                    .map(|t| HardNegative::new(t, HardNegativeKind::FromDataset)),
            ),
            None => {
                tracing::warn!("No dataset hard negatives to merge for text {}", record.id);
                result.missing_dataset += 1;
                on_event(MergeEvent::MissingSource {
                    text_id: record.id.clone(),
                    source: HardNegativeKind::FromDataset,
                });
            }
        }

        if record.extra.contains_key("llm_generated_hn") {
            merged.extend(
                record
                    .generated_hard_negatives()
                    .into_iter()
                    .take(self.options.from_api)
                    .map(|t| HardNegative::new(t, HardNegativeKind::Generated)),
            );
        } else {
            tracing::warn!("No generated hard negatives to merge for text {}", record.id);
            result.missing_generated += 1;
            on_event(MergeEvent::MissingSource {
                text_id: record.id.clone(),
                source: HardNegativeKind::Generated,
            });
        }

        merged
    }

    /// Attach hard-negative candidates to the records in memory.
    pub fn merge(
        &self,
        stream: &mut RecordStream,
        mut on_event: impl FnMut(MergeEvent),
    ) -> MergeResult {
        let mut result = MergeResult::default();
        on_event(MergeEvent::Started {
            total_records: stream.len(),
        });

        for i in 0..stream.len() {
            let Some(record) = stream.get(i) else {
                continue;
            };
            if !self.options.force && record.potential_hard_negatives.is_some() {
                result.kept += 1;
                on_event(MergeEvent::RecordKept {
                    text_id: record.id.clone(),
                });
                continue;
            }

            let merged = self.candidates_for(record, &mut result, &mut on_event);
            let text_id = record.id.clone();
            let count = merged.len();
            if let Some(record) = stream.records_mut().get_mut(i) {
                record.potential_hard_negatives = Some(merged);
            }
            result.merged += 1;
            on_event(MergeEvent::RecordMerged {
                text_id,
                merged: count,
            });
        }

        on_event(MergeEvent::Complete {
            merged: result.merged,
            kept: result.kept,
        });
        result
    }

    /// Merge and rewrite the stream in place.
    pub fn merge_and_save(
        &self,
        stream: &mut RecordStream,
        on_event: impl FnMut(MergeEvent),
    ) -> RepositoryResult<MergeResult> {
        let result = self.merge(stream, on_event);
        stream.save()?;
        tracing::info!(
            "Merged hard negatives into {} records of {}",
            result.merged,
            stream.path().display()
        );
        Ok(result)
    }
}
