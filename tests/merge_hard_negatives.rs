//! Merging dataset and generated hard negatives into a record file.

use serde_json::{json, Value};
use tempfile::tempdir;

use topic_annotator::models::HardNegativeKind;
use topic_annotator::repository::RecordStream;
use topic_annotator::services::{DatasetNegatives, MergeOptions, MergeService};

#[test]
fn test_merge_rewrites_record_file() {
    let dir = tempdir().unwrap();
    let records = dir.path().join("records.jsonl");
    let negatives = dir.path().join("negatives.json");

    let lines = [
        json!({
            "text_id": "t1",
            "text": "first",
            "scores": [{"topic": "A", "similarity": 0.3}],
            "llm_generated_hn": ["g1", "g2"],
            "state": 2
        }),
        json!({"text_id": "t2", "text": "second", "scores": []}),
    ];
    let body: Vec<String> = lines.iter().map(Value::to_string).collect();
    std::fs::write(&records, body.join("\n")).unwrap();
    std::fs::write(
        &negatives,
        json!({
            "t1": {"potential_negatives_all": [
                {"topic": "near", "similarity": 0.45},
                {"topic": "far", "similarity": 0.05},
                {"topic": "top", "similarity": 0.8}
            ]}
        })
        .to_string(),
    )
    .unwrap();

    let mut stream = RecordStream::load(&records).unwrap();
    let options = MergeOptions {
        from_dataset: 1,
        threshold: Some(0.5),
        ..MergeOptions::default()
    };
    let service = MergeService::new(DatasetNegatives::load(&negatives).unwrap(), options);
    let result = service.merge_and_save(&mut stream, |_| {}).unwrap();
    assert_eq!(result.merged, 2);
    assert_eq!(result.missing_dataset, 1);
    assert_eq!(result.missing_generated, 1);

    let reloaded = RecordStream::load(&records).unwrap();
    let first: Vec<(String, HardNegativeKind)> = reloaded.records()[0]
        .hard_negatives()
        .iter()
        .map(|hn| (hn.topic.clone(), hn.kind))
        .collect();
    assert_eq!(
        first,
        vec![
            ("near".to_string(), HardNegativeKind::FromDataset),
            ("g1".to_string(), HardNegativeKind::Generated),
            ("g2".to_string(), HardNegativeKind::Generated),
        ]
    );
    assert!(reloaded.records()[1].hard_negatives().is_empty());

    let raw = std::fs::read_to_string(&records).unwrap();
    let first_line: Value = serde_json::from_str(raw.lines().next().unwrap()).unwrap();
    assert_eq!(first_line["state"], json!(2));
    assert_eq!(first_line["llm_generated_hn"], json!(["g1", "g2"]));
    assert_eq!(
        first_line["potential_hard_negatives"][0],
        json!({"topic": "near", "type": "from_dataset"})
    );
}
