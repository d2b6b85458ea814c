use std::cmp::Reverse;

use crate::glossary::{Glossary, Term};

/// Order in which terms get to claim text.
///
/// Terms with a longer longest keyword come first; ties keep definition
/// order. Depends only on the glossary, so it is computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityOrder {
    positions: Vec<usize>,
}

impl PriorityOrder {
    /// Ranks every term of `glossary`.
    pub fn new(glossary: &Glossary) -> Self {
        let terms = glossary.terms();
        let mut positions: Vec<usize> = (0..terms.len()).collect();
        // sort_by_key is stable
        positions.sort_by_key(|&position| Reverse(terms[position].max_keyword_len()));
        Self { positions }
    }

    /// Term positions (indexes into [`Glossary::terms`]) in scan order.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Terms of `glossary` in scan order.
    ///
    /// Returns `None` if `glossary` does not have the term count this order
    /// was built for.
    pub fn ranked<'g>(&'g self, glossary: &'g Glossary) -> Option<impl Iterator<Item = &'g Term> + 'g> {
        let terms = glossary.terms();
        if terms.len() != self.positions.len() {
            return None;
        }
        Some(self.positions.iter().map(move |&position| &terms[position]))
    }
}
