use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{Category, GlossaryDefinition, Term, TermId};

/// Configuration defects that prevent a glossary from being built.
#[derive(Debug, Error)]
pub enum GlossaryError {
    /// A term id is blank
    #[error("Term id cannot be empty")]
    EmptyId,

    /// Two terms share an id
    #[error("Duplicate term id: {0}")]
    DuplicateTerm(TermId),

    /// A term has no usable keyword variant
    #[error("Term {0} has no keywords")]
    NoKeywords(TermId),

    /// A term is not listed in any category
    #[error("Term {0} is not assigned to any category")]
    Unassigned(TermId),

    /// A term is listed more than once across the category lists
    #[error("Term {id} is assigned to both {first} and {second}")]
    Reassigned {
        id: TermId,
        first: Category,
        second: Category,
    },

    /// A category lists a term that is not defined
    #[error("Category {category} references unknown term {id}")]
    UnknownTerm { id: TermId, category: Category },

    /// A symbol was given for a term that is not defined
    #[error("Symbol given for unknown term {0}")]
    UnknownSymbolTerm(TermId),

    /// The glossary file could not be read
    #[error("Failed to read glossary {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The glossary document is not valid JSON or has the wrong shape
    #[error("Invalid glossary document: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Immutable vocabulary of terms grouped into categories.
///
/// Built once and only read afterwards, so a single instance can be shared
/// by reference across threads.
#[derive(Debug, Clone)]
pub struct Glossary {
    terms: Vec<Term>,
    index: HashMap<TermId, usize>,
    members: BTreeMap<Category, Vec<usize>>,
}

impl Glossary {
    /// Validates a raw definition and builds the glossary.
    ///
    /// Keywords are trimmed and lowercased; blank and repeated variants of a
    /// term are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GlossaryError`] for blank or duplicate ids, terms without
    /// keywords, unknown ids in category lists, and terms that are listed in
    /// no category or more than once.
    pub fn from_definition(definition: GlossaryDefinition) -> Result<Self, GlossaryError> {
        let mut index = HashMap::with_capacity(definition.terms.len());
        let mut pending = Vec::with_capacity(definition.terms.len());

        for term in definition.terms {
            let id = TermId::new(term.id.as_str().trim());
            if id.as_str().is_empty() {
                return Err(GlossaryError::EmptyId);
            }
            if index.contains_key(&id) {
                return Err(GlossaryError::DuplicateTerm(id));
            }

            let keywords = normalize_keywords(term.keywords);
            if keywords.is_empty() {
                return Err(GlossaryError::NoKeywords(id));
            }

            index.insert(id.clone(), pending.len());
            pending.push((id, keywords, term.symbol));
        }

        let mut assigned: Vec<Option<Category>> = vec![None; pending.len()];
        let mut members: BTreeMap<Category, Vec<usize>> = BTreeMap::new();

        for (category, ids) in definition.categories {
            for id in ids {
                let id = TermId::new(id.as_str().trim());
                let Some(&position) = index.get(&id) else {
                    return Err(GlossaryError::UnknownTerm { id, category });
                };
                if let Some(first) = assigned[position] {
                    return Err(GlossaryError::Reassigned {
                        id,
                        first,
                        second: category,
                    });
                }
                assigned[position] = Some(category);
                members.entry(category).or_default().push(position);
            }
        }

        let terms = pending
            .into_iter()
            .zip(assigned)
            .map(|((id, keywords, symbol), category)| match category {
                Some(category) => Ok(Term::new(id, keywords, category, symbol)),
                None => Err(GlossaryError::Unassigned(id)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            terms,
            index,
            members,
        })
    }

    /// Parses and validates a JSON glossary document.
    ///
    /// # Errors
    ///
    /// Returns [`GlossaryError::Parse`] for malformed JSON and any
    /// validation error from [`Glossary::from_definition`].
    pub fn from_json_str(json: &str) -> Result<Self, GlossaryError> {
        let definition: GlossaryDefinition =
            serde_json::from_str(json).map_err(GlossaryError::Parse)?;
        Self::from_definition(definition)
    }

    /// Reads, parses and validates a JSON glossary file.
    ///
    /// # Errors
    ///
    /// Returns [`GlossaryError::Io`] if the file cannot be read, otherwise
    /// the errors of [`Glossary::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GlossaryError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GlossaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Returns all terms in definition order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Looks up a term by id.
    pub fn get(&self, id: &TermId) -> Option<&Term> {
        self.index.get(id).map(|&position| &self.terms[position])
    }

    /// Returns the terms of a category in display order.
    pub fn members(&self, category: Category) -> impl Iterator<Item = &Term> + '_ {
        self.member_positions(category)
            .iter()
            .map(|&position| &self.terms[position])
    }

    /// Returns the number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if the glossary holds no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub(crate) fn member_positions(&self, category: Category) -> &[usize] {
        self.members.get(&category).map_or(&[], Vec::as_slice)
    }
}

fn normalize_keywords(raw: Vec<String>) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::with_capacity(raw.len());
    for keyword in raw {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    keywords
}
