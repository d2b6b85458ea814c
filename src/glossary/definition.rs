use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Category, Glossary, GlossaryError, TermId};

/// Raw, unvalidated glossary document.
///
/// This is the shape of `data/glossary.json`: terms in definition order, and
/// per category the member term ids in display order. Turn it into a
/// [`Glossary`] with [`Glossary::from_definition`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlossaryDefinition {
    pub terms: Vec<TermDefinition>,
    #[serde(default)]
    pub categories: BTreeMap<Category, Vec<TermId>>,
}

/// One term entry of a [`GlossaryDefinition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermDefinition {
    pub id: TermId,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Builder for assembling a glossary in code.
///
/// Terms are appended to their category in call order.
///
/// # Examples
///
/// ```
/// use bjj_tagger::{Category, GlossaryBuilder};
///
/// let glossary = GlossaryBuilder::new()
///     .term("open_guard", Category::GuardType, ["open guard", "garde ouverte"])
///     .symbol("open_guard", "🌊")
///     .term("guard", Category::Technique, ["guard"])
///     .build()
///     .expect("valid glossary");
///
/// assert_eq!(glossary.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct GlossaryBuilder {
    definition: GlossaryDefinition,
    dangling_symbols: Vec<TermId>,
}

impl GlossaryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term and appends it to `category`.
    pub fn term<I, S>(mut self, id: impl Into<String>, category: Category, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = TermId::new(id);
        self.definition
            .categories
            .entry(category)
            .or_default()
            .push(id.clone());
        self.definition.terms.push(TermDefinition {
            id,
            keywords: keywords.into_iter().map(Into::into).collect(),
            symbol: None,
        });
        self
    }

    /// Sets the display symbol of a term added earlier.
    pub fn symbol(mut self, id: impl Into<String>, symbol: impl Into<String>) -> Self {
        let id = TermId::new(id);
        match self.definition.terms.iter_mut().rev().find(|t| t.id == id) {
            Some(term) => term.symbol = Some(symbol.into()),
            None => self.dangling_symbols.push(id),
        }
        self
    }

    /// Returns the definition assembled so far.
    pub fn definition(&self) -> &GlossaryDefinition {
        &self.definition
    }

    /// Validates the definition and builds the glossary.
    ///
    /// # Errors
    ///
    /// Returns [`GlossaryError`] for any configuration defect, including a
    /// symbol set for a term that was never added.
    pub fn build(self) -> Result<Glossary, GlossaryError> {
        if let Some(id) = self.dangling_symbols.into_iter().next() {
            return Err(GlossaryError::UnknownSymbolTerm(id));
        }
        Glossary::from_definition(self.definition)
    }
}
