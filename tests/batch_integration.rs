//! Batch Processing Integration Tests
//!
//! Reads the sample video export, classifies it and writes it back through
//! temporary files, checking that every record keeps its original fields.

use std::fs;
use std::path::PathBuf;

use bjj_tagger::{
    BatchOptions, Category, FieldSelection, Tagger, TermId, classify_batch, read_records,
    write_records,
};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Path of the sample export shipped with the tests.
fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("videos_sample.json")
}

fn load_sample() -> Vec<Value> {
    read_records(sample_path()).expect("sample export should parse")
}

fn label_of(tagger: &Tagger, id: &str) -> String {
    tagger.glossary().get(&TermId::new(id)).unwrap().label()
}

#[test]
fn test_sample_export_classifies_all_records() {
    // Arrange
    let tagger = Tagger::bundled().unwrap();
    let mut records = load_sample();

    // Act
    let stats = classify_batch(&tagger, &mut records, BatchOptions::default());

    // Assert
    assert_eq!(stats.total, 5);
    assert_eq!(stats.classified, 3);
    assert_eq!(stats.unclassified, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.per_category.get(&Category::Submission), Some(&2));
    assert_eq!(stats.per_category.get(&Category::Position), Some(&2));
    assert_eq!(stats.per_category.get(&Category::Takedown), None);

    assert_eq!(
        records[0]["classification"],
        json!({
            "position": ["Mount"],
            "pass": ["Guard Pass", "Knee Slice"],
            "submission": ["Armbar"]
        })
    );
    assert_eq!(
        records[1]["classification"],
        json!({
            "guard_type": [label_of(&tagger, "deep_half_guard")],
            "sweep": ["Waiter Sweep"]
        })
    );
    assert_eq!(
        records[2]["classification"],
        json!({"position": ["Side Control"], "submission": ["Kimura"]})
    );
    assert_eq!(records[3]["classification"], json!({}));
    assert_eq!(records[4], json!("not a record"));
}

#[test]
fn test_original_fields_are_preserved() {
    let tagger = Tagger::bundled().unwrap();
    let original = load_sample();
    let mut records = original.clone();

    classify_batch(&tagger, &mut records, BatchOptions::default());

    for (before, after) in original.iter().zip(&records) {
        let Some(before) = before.as_object() else {
            continue;
        };
        let after = after.as_object().unwrap();
        for (key, value) in before {
            assert_eq!(after.get(key), Some(value), "field {key} changed");
        }
        let keys: Vec<&String> = after.keys().collect();
        assert_eq!(keys.last().map(|k| k.as_str()), Some("classification"));
        assert_eq!(after.len(), before.len() + 1);
    }
}

#[test]
fn test_title_only_mode_ignores_description() {
    let tagger = Tagger::bundled().unwrap();
    let mut records = load_sample();
    let options = BatchOptions {
        fields: FieldSelection::TitleOnly,
        progress_every: 0,
    };

    classify_batch(&tagger, &mut records, options);

    assert_eq!(records[2]["classification"], json!({"submission": ["Kimura"]}));
}

#[test]
fn test_round_trip_through_files() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("videos.json");
    let output = dir.path().join("videos_processed.json");
    fs::copy(sample_path(), &input).unwrap();
    let tagger = Tagger::bundled().unwrap();

    // Act
    let mut records = read_records(&input).unwrap();
    classify_batch(&tagger, &mut records, BatchOptions::default());
    write_records(&output, &records).unwrap();

    // Assert
    let written = read_records(&output).unwrap();
    assert_eq!(written, records);
    let raw = fs::read_to_string(&output).unwrap();
    assert!(raw.contains("Clé de bras"), "non-ASCII text should not be escaped");
    assert!(raw.contains(&label_of(&tagger, "deep_half_guard")));
}

#[test]
fn test_invalid_input_reports_path() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.json");
    fs::write(&input, "[{\"title\": ").unwrap();

    let err = read_records(&input).unwrap_err();

    assert!(err.to_string().contains("broken.json"));
}
