use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

use crate::glossary::{Category, Glossary, Term, TermId};

/// Labels of the winning terms, grouped by category.
///
/// Categories iterate in [`Category::ALL`] order and labels in each
/// category's display order. A category with no winner is absent rather
/// than empty. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Classification(BTreeMap<Category, Vec<String>>);

impl<'de> Deserialize<'de> for Classification {
    /// Empty label lists are dropped so a parsed value compares equal to the
    /// one the grouper would produce.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut grouped = BTreeMap::<Category, Vec<String>>::deserialize(deserializer)?;
        grouped.retain(|_, labels| !labels.is_empty());
        Ok(Self(grouped))
    }
}

impl Classification {
    /// Returns true if no term matched.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of categories present.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Labels for one category, if any term in it matched.
    pub fn get(&self, category: Category) -> Option<&[String]> {
        self.0.get(&category).map(Vec::as_slice)
    }

    /// Returns true if `label` appears under `category`.
    pub fn contains(&self, category: Category, label: &str) -> bool {
        self.get(category)
            .is_some_and(|labels| labels.iter().any(|l| l == label))
    }

    /// Iterates over present categories and their labels.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> + '_ {
        self.0
            .iter()
            .map(|(category, labels)| (*category, labels.as_slice()))
    }

    /// Total number of labels across all categories.
    pub fn label_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Consumes the classification and returns the underlying map.
    pub fn into_inner(self) -> BTreeMap<Category, Vec<String>> {
        self.0
    }
}

/// Renders winning terms into a [`Classification`].
///
/// Label order follows each category's member list in the glossary, not the
/// order in which the terms won.
pub(crate) fn group<'a>(glossary: &Glossary, winners: impl IntoIterator<Item = &'a Term>) -> Classification {
    let winners: HashSet<&TermId> = winners.into_iter().map(Term::id).collect();
    let mut grouped = BTreeMap::new();

    for category in Category::ALL {
        let labels: Vec<String> = glossary
            .members(category)
            .filter(|term| winners.contains(term.id()))
            .map(Term::label)
            .collect();
        if !labels.is_empty() {
            grouped.insert(category, labels);
        }
    }

    Classification(grouped)
}
