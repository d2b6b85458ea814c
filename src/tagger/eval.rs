//! Evaluation helpers for tuning the glossary.
//!
//! This module provides utilities for scoring classifications against a
//! labelled corpus and for loading such corpora.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Classification, Tagger};

/// Errors raised while loading a corpus.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The corpus file could not be read
    #[error("Failed to read corpus {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The corpus is not a JSON array of entries
    #[error("Invalid corpus {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Test corpus entry structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusEntry {
    /// Record title.
    pub title: String,
    /// Record description.
    #[serde(default)]
    pub description: String,
    /// Record tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Expected classification.
    pub expected: Classification,
    /// Notes about this test case.
    #[serde(default)]
    pub notes: String,
}

/// Scores for one corpus entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryScore {
    pub title: String,
    pub jaccard: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Scores for a whole corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    pub entries: Vec<EntryScore>,
    pub mean_jaccard: f64,
    pub mean_precision: f64,
    pub mean_recall: f64,
}

impl EvalReport {
    /// Entries whose classification did not match exactly.
    pub fn misses(&self) -> impl Iterator<Item = &EntryScore> + '_ {
        self.entries.iter().filter(|entry| entry.jaccard < 1.0)
    }
}

/// Loads a labelled corpus.
///
/// # Arguments
///
/// * `corpus_path` - Optional path to corpus file. If None, uses the corpus
///   shipped in `tests/fixtures`.
///
/// # Errors
///
/// Returns `EvalError` if the file cannot be read or parsed.
///
/// # Examples
///
/// ```no_run
/// use bjj_tagger::tagger::load_corpus;
///
/// let entries = load_corpus(None)?;
/// for entry in entries {
///     println!("Title: {}", entry.title);
/// }
/// # Ok::<(), bjj_tagger::tagger::EvalError>(())
/// ```
pub fn load_corpus(corpus_path: Option<PathBuf>) -> Result<Vec<CorpusEntry>, EvalError> {
    let path = corpus_path.unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("classification_corpus.json")
    });

    let content = fs::read_to_string(&path).map_err(|source| EvalError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| EvalError::Parse { path, source })
}

/// Calculates Jaccard similarity between two label sets.
///
/// Intersection size over union size; two empty sets are identical.
///
/// # Examples
///
/// ```
/// use bjj_tagger::tagger::jaccard_similarity;
/// use std::collections::HashSet;
///
/// let expected: HashSet<String> = ["position/Mount", "submission/Armbar"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// let actual: HashSet<String> = ["position/Mount", "technique/Escape"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
///
/// // Intersection 1, union 3
/// assert!((jaccard_similarity(&expected, &actual) - 1.0 / 3.0).abs() < 1e-9);
/// ```
pub fn jaccard_similarity(expected: &HashSet<String>, actual: &HashSet<String>) -> f64 {
    if expected.is_empty() && actual.is_empty() {
        return 1.0;
    }

    let intersection = expected.intersection(actual).count();
    let union = expected.union(actual).count();

    intersection as f64 / union as f64
}

/// Calculates precision and recall of `actual` against `expected`.
pub fn precision_recall(expected: &HashSet<String>, actual: &HashSet<String>) -> (f64, f64) {
    let true_positives = expected.intersection(actual).count();

    let precision = if actual.is_empty() {
        if expected.is_empty() { 1.0 } else { 0.0 }
    } else {
        true_positives as f64 / actual.len() as f64
    };

    let recall = if expected.is_empty() {
        if actual.is_empty() { 1.0 } else { 0.0 }
    } else {
        true_positives as f64 / expected.len() as f64
    };

    (precision, recall)
}

/// Flattens a classification into `category/label` strings.
pub fn label_set(classification: &Classification) -> HashSet<String> {
    classification
        .iter()
        .flat_map(|(category, labels)| labels.iter().map(move |label| format!("{category}/{label}")))
        .collect()
}

/// Compares two classifications.
///
/// Returns (jaccard_similarity, precision, recall). A label under the wrong
/// category counts as a miss.
pub fn compare_classifications(expected: &Classification, actual: &Classification) -> (f64, f64, f64) {
    let expected = label_set(expected);
    let actual = label_set(actual);

    let jaccard = jaccard_similarity(&expected, &actual);
    let (precision, recall) = precision_recall(&expected, &actual);

    (jaccard, precision, recall)
}

/// Classifies every corpus entry and scores it against its expectation.
pub fn evaluate(tagger: &Tagger, entries: &[CorpusEntry]) -> EvalReport {
    let scores: Vec<EntryScore> = entries
        .iter()
        .map(|entry| {
            let actual = tagger.classify(&entry.title, &entry.description, &entry.tags);
            let (jaccard, precision, recall) = compare_classifications(&entry.expected, &actual);
            EntryScore {
                title: entry.title.clone(),
                jaccard,
                precision,
                recall,
            }
        })
        .collect();

    let mean = |metric: fn(&EntryScore) -> f64| {
        if scores.is_empty() {
            0.0
        } else {
            scores.iter().map(metric).sum::<f64>() / scores.len() as f64
        }
    };

    EvalReport {
        mean_jaccard: mean(|s| s.jaccard),
        mean_precision: mean(|s| s.precision),
        mean_recall: mean(|s| s.recall),
        entries: scores,
    }
}
