//! Classifying whole files of JSON records.
//!
//! Records are classified in parallel with rayon; the [`Tagger`] is shared
//! by reference since it is read-only.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;

use crate::glossary::Category;
use crate::record::{FieldSelection, TextFields, attach_classification};
use crate::tagger::Tagger;

/// Default number of records between progress log lines.
pub const DEFAULT_PROGRESS_EVERY: usize = 10;

/// Options for [`classify_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Which record fields feed the classifier.
    pub fields: FieldSelection,
    /// Log progress after every this many records; 0 disables progress logs.
    pub progress_every: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            fields: FieldSelection::All,
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

/// Totals for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Records in the input.
    pub total: usize,
    /// Records with at least one label.
    pub classified: usize,
    /// Records with no label.
    pub unclassified: usize,
    /// Records that were not JSON objects.
    pub skipped: usize,
    /// Number of records carrying at least one label per category.
    pub per_category: BTreeMap<Category, usize>,
}

enum Outcome {
    Skipped,
    Classified(Vec<Category>),
}

/// Progress is reported every `every` records and once more at the end.
fn should_log_progress(finished: usize, total: usize, every: usize) -> bool {
    every > 0 && (finished % every == 0 || finished == total)
}

/// Classifies every record and attaches the result under `classification`.
///
/// Records that are not objects are left unchanged and counted as skipped.
///
/// # Examples
///
/// ```
/// use bjj_tagger::{BatchOptions, Tagger, classify_batch};
/// use serde_json::json;
///
/// let tagger = Tagger::bundled()?;
/// let mut records = vec![json!({"title": "Basic escape drill"}), json!(7)];
///
/// let stats = classify_batch(&tagger, &mut records, BatchOptions::default());
///
/// assert_eq!(stats.classified, 1);
/// assert_eq!(stats.skipped, 1);
/// assert_eq!(records[0]["classification"]["technique"], json!(["Escape", "Drill"]));
/// # Ok::<(), bjj_tagger::TaggerError>(())
/// ```
pub fn classify_batch(tagger: &Tagger, records: &mut [Value], options: BatchOptions) -> BatchStats {
    let total = records.len();
    let done = AtomicUsize::new(0);

    let outcomes: Vec<Outcome> = records
        .par_iter_mut()
        .map(|record| {
            let outcome = classify_record(tagger, record, options.fields);

            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            if should_log_progress(finished, total, options.progress_every) {
                info!("Processed {finished}/{total} records");
            }
            outcome
        })
        .collect();

    let mut stats = BatchStats {
        total,
        ..BatchStats::default()
    };
    for outcome in outcomes {
        match outcome {
            Outcome::Skipped => stats.skipped += 1,
            Outcome::Classified(categories) if categories.is_empty() => stats.unclassified += 1,
            Outcome::Classified(categories) => {
                stats.classified += 1;
                for category in categories {
                    *stats.per_category.entry(category).or_default() += 1;
                }
            }
        }
    }

    info!(
        "Classified {} of {} records ({} without labels, {} skipped)",
        stats.classified, stats.total, stats.unclassified, stats.skipped
    );
    stats
}

fn classify_record(tagger: &Tagger, record: &mut Value, fields: FieldSelection) -> Outcome {
    if !record.is_object() {
        return Outcome::Skipped;
    }

    let text = TextFields::from_record(record, fields).normalize();
    let classification = tagger.classify_text(&text);
    let categories = classification.iter().map(|(category, _)| category).collect();
    attach_classification(record, &classification);
    Outcome::Classified(categories)
}

/// Reads a JSON array of records.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Input file is not a JSON array of records: {}", path.display()))
}

/// Writes records as a pretty-printed JSON array.
///
/// Non-ASCII text is written as UTF-8, not escaped.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn write_records(path: impl AsRef<Path>, records: &[Value]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let mut json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;
    json.push('\n');
    fs::write(path, json).with_context(|| format!("Failed to write output file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn tagger() -> Tagger {
        Tagger::bundled().unwrap()
    }

    #[test]
    fn counts_classified_unclassified_and_skipped() {
        let mut records = vec![
            json!({"title": "Closed guard armbar from the guard"}),
            json!({"title": "the farm"}),
            json!(null),
            json!({"title": "Knee slice pass to mount and armbar"}),
        ];

        let stats = classify_batch(&tagger(), &mut records, BatchOptions::default());

        assert_eq!(stats.total, 4);
        assert_eq!(stats.classified, 2);
        assert_eq!(stats.unclassified, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.per_category.get(&Category::Submission), Some(&2));
        assert_eq!(stats.per_category.get(&Category::Pass), Some(&1));
        assert_eq!(records[1]["classification"], json!({}));
        assert_eq!(records[2], json!(null));
    }

    #[test]
    fn title_only_mode_ignores_description() {
        let mut records = vec![json!({"title": "Armbar", "description": "from mount"})];
        let options = BatchOptions {
            fields: FieldSelection::TitleOnly,
            ..BatchOptions::default()
        };

        classify_batch(&tagger(), &mut records, options);

        assert_eq!(records[0]["classification"], json!({"submission": ["Armbar"]}));
    }

    #[test]
    fn parallel_results_match_sequential_classification() {
        let tagger = tagger();
        let titles = [
            "Single Leg X Sweep to back control",
            "Deep half guard waiter sweep",
            "50/50 heel hook",
            "arm drag to back take",
        ];
        let mut records: Vec<Value> = titles
            .iter()
            .cycle()
            .take(40)
            .map(|title| json!({"title": title}))
            .collect();

        classify_batch(&tagger, &mut records, BatchOptions::default());

        for record in &records {
            let title = record["title"].as_str().unwrap();
            let expected = serde_json::to_value(tagger.classify(title, "", &[] as &[&str])).unwrap();
            assert_eq!(record["classification"], expected);
        }
    }

    #[test]
    fn write_then_read_keeps_unicode_unescaped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.json");
        let records = vec![json!({"title": "Clé de bras", "classification": {"guard_type": ["🔒 Closed Guard"]}})];

        write_records(&path, &records).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Clé de bras"));
        assert!(raw.contains("🔒 Closed Guard"));
        assert_eq!(read_records(&path).unwrap(), records);
    }

    #[test]
    fn read_rejects_non_array_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("object.json");
        fs::write(&path, r#"{"title": "not a list"}"#).unwrap();

        let err = read_records(&path).unwrap_err();
        assert!(err.to_string().contains("not a JSON array"));
    }

    #[test]
    fn read_reports_missing_file() {
        let err = read_records("/nonexistent/videos.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn progress_logged_at_interval_and_at_end() {
        assert!(should_log_progress(10, 25, 10));
        assert!(should_log_progress(20, 25, 10));
        assert!(!should_log_progress(5, 25, 10));
        assert!(!should_log_progress(24, 25, 10));
        assert!(should_log_progress(25, 25, 10));
        assert!(should_log_progress(3, 3, 10));
    }

    #[test]
    fn progress_disabled_when_interval_is_zero() {
        assert!(!should_log_progress(10, 10, 0));
        assert!(!should_log_progress(1, 25, 0));
    }
}
