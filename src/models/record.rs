//! Candidate records produced by the scoring pipeline.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Review status of a candidate record.
///
/// Persisted as the integer `state` field (`0`, `1`, `2`) so files written
/// by earlier tooling keep loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum RecordStatus {
    #[default]
    NotVisited,
    Skipped,
    Checked,
}

impl From<u8> for RecordStatus {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Skipped,
            2 => Self::Checked,
            _ => Self::NotVisited,
        }
    }
}

impl From<RecordStatus> for u8 {
    fn from(status: RecordStatus) -> Self {
        match status {
            RecordStatus::NotVisited => 0,
            RecordStatus::Skipped => 1,
            RecordStatus::Checked => 2,
        }
    }
}

/// A topic proposed for a text together with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub topic: String,
    pub similarity: f64,
}

impl Candidate {
    pub fn new(topic: impl Into<String>, similarity: f64) -> Self {
        Self {
            topic: topic.into(),
            similarity,
        }
    }
}

/// Where a hard-negative candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardNegativeKind {
    /// Mined from other texts of the dataset.
    FromDataset,
    /// Produced by an LLM supplier.
    Generated,
    /// Rejected by the annotator while cleaning topics.
    Rejected,
}

impl HardNegativeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FromDataset => "from_dataset",
            Self::Generated => "generated",
            Self::Rejected => "rejected",
        }
    }

    /// One-letter code shown next to each hard negative on screen.
    pub fn shortcut(&self) -> char {
        match self {
            Self::FromDataset => 'D',
            Self::Generated => 'G',
            Self::Rejected => 'R',
        }
    }
}

/// A potential hard negative attached to a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardNegative {
    pub topic: String,
    #[serde(rename = "type")]
    pub kind: HardNegativeKind,
    /// Verdict of the hard-negative annotator, absent until reviewed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<bool>,
}

impl HardNegative {
    pub fn new(topic: impl Into<String>, kind: HardNegativeKind) -> Self {
        Self {
            topic: topic.into(),
            kind,
            annotation: None,
        }
    }
}

/// One text with its scored topic candidates and review status.
///
/// Fields this crate does not know about are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "text_id")]
    pub id: String,
    pub text: String,
    #[serde(rename = "scores", default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_hard_negatives: Option<Vec<HardNegative>>,
    #[serde(rename = "state", default)]
    pub status: RecordStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CandidateRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            candidates,
            potential_hard_negatives: None,
            status: RecordStatus::NotVisited,
            extra: Map::new(),
        }
    }

    /// Candidates in review order: ascending similarity, ties in file order.
    pub fn sorted_candidates(&self) -> Vec<Candidate> {
        let mut sorted = self.candidates.clone();
        sorted.sort_by(|a, b| a.similarity.total_cmp(&b.similarity));
        sorted
    }

    /// Hard-negative candidates supplied so far (empty when none were merged).
    pub fn hard_negatives(&self) -> &[HardNegative] {
        self.potential_hard_negatives.as_deref().unwrap_or(&[])
    }

    /// LLM-generated hard negatives left on the record by the generator.
    pub fn generated_hard_negatives(&self) -> Vec<String> {
        self.extra
            .get("llm_generated_hn")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_as_integer() {
        let record = CandidateRecord {
            status: RecordStatus::Checked,
            ..CandidateRecord::new("t1", "text", vec![])
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["state"], 2);
    }

    #[test]
    fn test_missing_state_means_not_visited() {
        let record: CandidateRecord =
            serde_json::from_str(r#"{"text_id":"t1","text":"x","scores":[]}"#).unwrap();
        assert_eq!(record.status, RecordStatus::NotVisited);
        assert!(record.potential_hard_negatives.is_none());
    }

    #[test]
    fn test_unknown_fields_are_preserved() {
        let line = r#"{"text_id":"t1","text":"x","scores":[],"state":1,"llm_generated_hn":["a","b"]}"#;
        let record: CandidateRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.generated_hard_negatives(), vec!["a", "b"]);

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["llm_generated_hn"][1], "b");
        assert_eq!(back["state"], 1);
    }

    #[test]
    fn test_sorted_candidates_ascending_and_stable() {
        let record = CandidateRecord::new(
            "t1",
            "x",
            vec![
                Candidate::new("high", 0.9),
                Candidate::new("tie-first", 0.3),
                Candidate::new("low", 0.1),
                Candidate::new("tie-second", 0.3),
            ],
        );
        let order: Vec<_> = record
            .sorted_candidates()
            .into_iter()
            .map(|c| c.topic)
            .collect();
        assert_eq!(order, vec!["low", "tie-first", "tie-second", "high"]);
    }

    #[test]
    fn test_nan_similarity_sorts_last() {
        let record = CandidateRecord::new(
            "t1",
            "x",
            vec![
                Candidate::new("unscored", f64::NAN),
                Candidate::new("high", 0.9),
                Candidate::new("low", 0.1),
            ],
        );
        let order: Vec<_> = record
            .sorted_candidates()
            .into_iter()
            .map(|c| c.topic)
            .collect();
        assert_eq!(order, vec!["low", "high", "unscored"]);
    }

    #[test]
    fn test_hard_negative_kind_serializes_snake_case() {
        let hn = HardNegative::new("x", HardNegativeKind::FromDataset);
        let json = serde_json::to_string(&hn).unwrap();
        assert_eq!(json, r#"{"topic":"x","type":"from_dataset"}"#);
    }
}
