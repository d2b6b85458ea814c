//! Reading text out of, and writing classifications back into, JSON records.
//!
//! Records are arbitrary JSON objects. Only `title`, `description` and `tags`
//! are read; everything else passes through untouched.

use serde_json::Value;

use crate::tagger::{Classification, NormalizedText};

/// Field that receives the classification.
pub const CLASSIFICATION_FIELD: &str = "classification";

/// Which record fields feed the classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldSelection {
    /// Title, description and tags.
    #[default]
    All,
    /// Title only; description and tags are ignored.
    TitleOnly,
}

/// Text fields extracted from one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFields {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl TextFields {
    /// Extracts the text fields of `record`.
    ///
    /// Missing, null or non-string fields read as empty. Non-string tag
    /// entries are skipped. A record that is not an object yields empty
    /// fields.
    ///
    /// # Examples
    ///
    /// ```
    /// use bjj_tagger::{FieldSelection, TextFields};
    /// use serde_json::json;
    ///
    /// let record = json!({"title": "Armbar", "description": null, "tags": ["gi", 3]});
    /// let fields = TextFields::from_record(&record, FieldSelection::All);
    ///
    /// assert_eq!(fields.title, "Armbar");
    /// assert_eq!(fields.description, "");
    /// assert_eq!(fields.tags, vec!["gi"]);
    /// ```
    pub fn from_record(record: &Value, selection: FieldSelection) -> Self {
        let title = string_field(record, "title");
        if selection == FieldSelection::TitleOnly {
            return Self {
                title,
                ..Self::default()
            };
        }

        let tags = match record.get("tags") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            title,
            description: string_field(record, "description"),
            tags,
        }
    }

    /// Joins and normalizes the fields for matching.
    pub fn normalize(&self) -> NormalizedText {
        NormalizedText::new(&self.title, &self.description, &self.tags)
    }
}

fn string_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Stores `classification` under the `classification` key of `record`.
///
/// An existing value is replaced in place; other fields keep their order.
/// Returns false, leaving the record unchanged, if it is not an object.
pub fn attach_classification(record: &mut Value, classification: &Classification) -> bool {
    let Value::Object(fields) = record else {
        return false;
    };

    fields.insert(CLASSIFICATION_FIELD.to_string(), classification_value(classification));
    true
}

/// Builds the JSON object for a classification, categories in output order.
fn classification_value(classification: &Classification) -> Value {
    Value::Object(
        classification
            .iter()
            .map(|(category, labels)| {
                let labels = labels.iter().cloned().map(Value::String).collect();
                (category.as_str().to_string(), Value::Array(labels))
            })
            .collect(),
    )
}
