//! Annotation outcomes written to the durable store.

use serde::{Deserialize, Serialize};

use super::record::{Candidate, HardNegative, HardNegativeKind};

/// The result of cleaning one text, keyed by `text_id` in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationOutcome {
    /// Filled from the store key when absent in older files.
    #[serde(default)]
    pub text_id: String,
    pub text: String,
    /// Accepted topics in review order.
    pub topics: Vec<String>,
    #[serde(default)]
    pub potential_hard_negatives: Vec<HardNegative>,
    /// Set when the hard-negative annotator skipped this text.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

impl AnnotationOutcome {
    /// Build an outcome from a finished topic review.
    ///
    /// Every candidate whose topic was not accepted becomes a `rejected`
    /// hard negative. Existing hard negatives of other provenance are kept
    /// ahead of them, minus any whose topic ended up accepted.
    pub fn from_review(
        text_id: impl Into<String>,
        text: impl Into<String>,
        candidates: &[Candidate],
        topics: Vec<String>,
        existing: &[HardNegative],
    ) -> Self {
        let mut hard_negatives: Vec<HardNegative> = Vec::new();
        let push = |hn: HardNegative, list: &mut Vec<HardNegative>| {
            if !topics.contains(&hn.topic) && !list.iter().any(|h| h.topic == hn.topic) {
                list.push(hn);
            }
        };

        for hn in existing.iter().filter(|h| h.kind != HardNegativeKind::Rejected) {
            push(
                HardNegative {
                    annotation: None,
                    ..hn.clone()
                },
                &mut hard_negatives,
            );
        }
        for candidate in candidates {
            push(
                HardNegative::new(candidate.topic.clone(), HardNegativeKind::Rejected),
                &mut hard_negatives,
            );
        }

        Self {
            text_id: text_id.into(),
            text: text.into(),
            topics,
            potential_hard_negatives: hard_negatives,
            skipped: false,
        }
    }

    /// Topics tagged `rejected` for this text.
    pub fn rejected_topics(&self) -> Vec<&str> {
        self.potential_hard_negatives
            .iter()
            .filter(|hn| hn.kind == HardNegativeKind::Rejected)
            .map(|hn| hn.topic.as_str())
            .collect()
    }

    /// Whether the hard-negative annotator has already reviewed this text.
    pub fn hard_negatives_annotated(&self) -> bool {
        self.potential_hard_negatives
            .iter()
            .any(|hn| hn.annotation.is_some())
    }
}

/// Final hard-negative selection for one text, one JSON Lines row each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedHardNegatives {
    pub text_id: String,
    pub text: String,
    pub topics: Vec<String>,
    pub hard_negatives: Vec<String>,
}

impl AnnotatedHardNegatives {
    pub fn from_outcome(outcome: &AnnotationOutcome) -> Self {
        Self {
            text_id: outcome.text_id.clone(),
            text: outcome.text.clone(),
            topics: outcome.topics.clone(),
            hard_negatives: outcome
                .potential_hard_negatives
                .iter()
                .filter(|hn| hn.annotation == Some(true))
                .map(|hn| hn.topic.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::new("A", 0.1),
            Candidate::new("B", 0.5),
            Candidate::new("C", 0.9),
        ]
    }

    #[test]
    fn test_rejected_candidates_become_hard_negatives() {
        let outcome = AnnotationOutcome::from_review(
            "t1",
            "text",
            &candidates(),
            vec!["B".into(), "C".into()],
            &[],
        );
        assert_eq!(outcome.rejected_topics(), vec!["A"]);
    }

    #[test]
    fn test_existing_hard_negatives_merge_ahead_of_rejected() {
        let existing = vec![
            HardNegative::new("D1", HardNegativeKind::FromDataset),
            HardNegative::new("stale", HardNegativeKind::Rejected),
            HardNegative::new("C", HardNegativeKind::Generated),
            HardNegative::new("G1", HardNegativeKind::Generated),
        ];
        let outcome = AnnotationOutcome::from_review(
            "t1",
            "text",
            &candidates(),
            vec!["B".into(), "C".into()],
            &existing,
        );
        let topics: Vec<_> = outcome
            .potential_hard_negatives
            .iter()
            .map(|hn| (hn.topic.as_str(), hn.kind))
            .collect();
        assert_eq!(
            topics,
            vec![
                ("D1", HardNegativeKind::FromDataset),
                ("G1", HardNegativeKind::Generated),
                ("A", HardNegativeKind::Rejected),
            ]
        );
    }

    #[test]
    fn test_skipped_flag_omitted_when_false() {
        let outcome = AnnotationOutcome::from_review("t1", "x", &[], vec![], &[]);
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("skipped").is_none());
    }

    #[test]
    fn test_selected_hard_negatives() {
        let mut outcome =
            AnnotationOutcome::from_review("t1", "x", &candidates(), vec!["C".into()], &[]);
        outcome.potential_hard_negatives[0].annotation = Some(true);
        outcome.potential_hard_negatives[1].annotation = Some(false);
        assert!(outcome.hard_negatives_annotated());

        let row = AnnotatedHardNegatives::from_outcome(&outcome);
        assert_eq!(row.hard_negatives, vec!["A"]);
    }
}
