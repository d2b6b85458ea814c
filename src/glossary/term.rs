use std::fmt;

use serde::{Deserialize, Serialize};

use super::Category;

/// Canonical identifier of a term, e.g. `single_leg_x`.
///
/// Wraps the raw id string so term ids are not mixed up with keyword
/// phrases or rendered labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(String);

impl TermId {
    /// Creates a new term id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TermId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A canonical concept with its keyword variants.
///
/// Keywords are stored normalized (trimmed, lowercased, deduplicated) and in
/// definition order; there is always at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    id: TermId,
    keywords: Vec<String>,
    category: Category,
    symbol: Option<String>,
}

impl Term {
    pub(crate) fn new(
        id: TermId,
        keywords: Vec<String>,
        category: Category,
        symbol: Option<String>,
    ) -> Self {
        Self {
            id,
            keywords,
            category,
            symbol,
        }
    }

    /// Returns the term's canonical id.
    pub fn id(&self) -> &TermId {
        &self.id
    }

    /// Returns the keyword variants in definition order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns the category this term is displayed under.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the optional display symbol.
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Character length of the longest keyword variant.
    pub fn max_keyword_len(&self) -> usize {
        self.keywords
            .iter()
            .map(|keyword| keyword.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Renders the caller-facing label.
    ///
    /// # Examples
    ///
    /// ```
    /// use bjj_tagger::{Category, GlossaryBuilder, TermId};
    ///
    /// let glossary = GlossaryBuilder::new()
    ///     .term("closed_guard", Category::GuardType, ["closed guard"])
    ///     .symbol("closed_guard", "🔒")
    ///     .term("heel_hook", Category::Submission, ["heel hook"])
    ///     .build()
    ///     .unwrap();
    ///
    /// let closed = glossary.get(&TermId::new("closed_guard")).unwrap();
    /// assert_eq!(closed.label(), "🔒 Closed Guard");
    /// let heel_hook = glossary.get(&TermId::new("heel_hook")).unwrap();
    /// assert_eq!(heel_hook.label(), "Heel Hook");
    /// ```
    pub fn label(&self) -> String {
        let name = title_case(&self.id.as_str().replace('_', " "));
        match self.symbol() {
            Some(symbol) if self.category.shows_symbol() => format!("{symbol} {name}"),
            _ => name,
        }
    }
}

/// Upper-cases each letter that follows a non-letter and lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if after_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(ch);
            after_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(id: &str, category: Category, symbol: Option<&str>) -> Term {
        Term::new(
            TermId::new(id),
            vec!["a".to_string()],
            category,
            symbol.map(String::from),
        )
    }

    #[test]
    fn term_id_serializes_as_raw_string() {
        let id = TermId::new("x_guard");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"x_guard\"");

        let deserialized: TermId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn title_case_splits_on_non_letters() {
        assert_eq!(title_case("kiss of the dragon"), "Kiss Of The Dragon");
        assert_eq!(title_case("50 50 guard"), "50 50 Guard");
        assert_eq!(title_case("z-lock"), "Z-Lock");
        assert_eq!(title_case("d'arce"), "D'Arce");
        assert_eq!(title_case("SLX"), "Slx");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn label_replaces_underscores() {
        let t = term("rear_naked_choke", Category::Submission, None);
        assert_eq!(t.label(), "Rear Naked Choke");
    }

    #[test]
    fn symbol_only_prefixes_guard_types() {
        let guard = term("crab_ride", Category::GuardType, Some("🦀"));
        assert_eq!(guard.label(), "🦀 Crab Ride");

        let submission = term("honey_hole", Category::Submission, Some("🍯"));
        assert_eq!(submission.label(), "Honey Hole");

        let bare_guard = term("low_guard", Category::GuardType, None);
        assert_eq!(bare_guard.label(), "Low Guard");
    }

    #[test]
    fn max_keyword_len_counts_characters() {
        let t = Term::new(
            TermId::new("closed_guard"),
            vec!["garde fermée".to_string(), "closed guard".to_string()],
            Category::GuardType,
            None,
        );
        assert_eq!(t.max_keyword_len(), 12);
    }
}
