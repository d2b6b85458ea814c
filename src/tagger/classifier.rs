use std::collections::HashMap;

use log::{debug, trace};
use thiserror::Error;

use super::allocator::SpanAllocator;
use super::grouper::{self, Classification};
use super::matcher::{KeywordIndex, MatchStrategy};
use super::ranker::PriorityOrder;
use super::text::{NormalizedText, Span};
use crate::glossary::{Glossary, GlossaryError, Term};

/// Errors that can occur while setting up a [`Tagger`].
#[derive(Debug, Error)]
pub enum TaggerError {
    /// The glossary failed validation
    #[error(transparent)]
    Glossary(#[from] GlossaryError),

    /// The keyword automaton could not be built
    #[error("Failed to build keyword automaton: {0}")]
    Automaton(#[from] aho_corasick::BuildError),
}

/// A span of text won by a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim<'a> {
    /// The winning term.
    pub term: &'a Term,
    /// Where it matched, in characters.
    pub span: Span,
    /// The keyword variant that matched.
    pub keyword: &'a str,
}

/// Builder for constructing `Tagger` instances.
///
/// # Examples
///
/// ```
/// use bjj_tagger::{Glossary, MatchStrategy, TaggerBuilder};
///
/// let tagger = TaggerBuilder::new()
///     .glossary(Glossary::bundled()?)
///     .strategy(MatchStrategy::Scan)
///     .build()?;
///
/// assert_eq!(tagger.strategy(), MatchStrategy::Scan);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct TaggerBuilder {
    glossary: Option<Glossary>,
    strategy: MatchStrategy,
}

impl TaggerBuilder {
    /// Creates a new `TaggerBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the vocabulary. Defaults to [`Glossary::bundled`].
    pub fn glossary(mut self, glossary: Glossary) -> Self {
        self.glossary = Some(glossary);
        self
    }

    /// Sets how keyword occurrences are located.
    pub fn strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builds the `Tagger`.
    ///
    /// # Errors
    ///
    /// Returns `TaggerError` if the bundled glossary is used and fails to
    /// validate, or if the keyword automaton cannot be built.
    pub fn build(self) -> Result<Tagger, TaggerError> {
        let glossary = match self.glossary {
            Some(glossary) => glossary,
            None => Glossary::bundled()?,
        };
        Tagger::with_strategy(glossary, self.strategy)
    }
}

/// Tags free-form text with glossary terms.
///
/// Terms are tried in [`PriorityOrder`]. For each term, its keyword variants
/// are tried in definition order and each variant's occurrences left to
/// right; the first occurrence that does not overlap an earlier claim wins
/// the term and ends its search. A term therefore wins at most once, and a
/// more specific phrase always gets to claim text before a shorter phrase
/// inside it.
///
/// All state is read-only after construction, so one `Tagger` can serve any
/// number of threads by reference.
///
/// # Examples
///
/// ```
/// use bjj_tagger::{Category, Tagger};
///
/// let tagger = Tagger::bundled()?;
/// let classification = tagger.classify("Single Leg X Sweep to back control", "", &[] as &[&str]);
///
/// assert!(classification.contains(Category::GuardType, "🦵 Single Leg X"));
/// assert!(classification.contains(Category::Position, "Back Control"));
/// assert!(classification.get(Category::Takedown).is_none());
/// # Ok::<(), bjj_tagger::TaggerError>(())
/// ```
pub struct Tagger {
    glossary: Glossary,
    priority: PriorityOrder,
    index: KeywordIndex,
    term_keywords: Vec<Vec<usize>>,
    strategy: MatchStrategy,
}

impl Tagger {
    /// Creates a tagger over `glossary` using the automaton strategy.
    ///
    /// # Errors
    ///
    /// Returns `TaggerError::Automaton` if the keyword automaton cannot be built.
    pub fn new(glossary: Glossary) -> Result<Self, TaggerError> {
        Self::with_strategy(glossary, MatchStrategy::default())
    }

    /// Creates a tagger over the bundled glossary.
    ///
    /// # Errors
    ///
    /// Returns `TaggerError` if the bundled glossary fails validation.
    pub fn bundled() -> Result<Self, TaggerError> {
        Self::new(Glossary::bundled()?)
    }

    /// Creates a tagger with an explicit match strategy.
    ///
    /// # Errors
    ///
    /// Returns `TaggerError::Automaton` if the keyword automaton cannot be built.
    pub fn with_strategy(glossary: Glossary, strategy: MatchStrategy) -> Result<Self, TaggerError> {
        let priority = PriorityOrder::new(&glossary);

        let (phrases, term_keywords) = intern_keywords(&glossary);
        let index = KeywordIndex::new(phrases, strategy)?;
        debug!(
            "Tagger ready: {} terms, {} distinct keywords, {} matching",
            glossary.len(),
            index.len(),
            strategy
        );

        Ok(Self {
            glossary,
            priority,
            index,
            term_keywords,
            strategy,
        })
    }

    /// Returns the vocabulary.
    pub fn glossary(&self) -> &Glossary {
        &self.glossary
    }

    /// Returns the scan order.
    pub fn priority(&self) -> &PriorityOrder {
        &self.priority
    }

    /// Returns the match strategy in use.
    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Classifies a record's title, description and tags.
    pub fn classify<S: AsRef<str>>(&self, title: &str, description: &str, tags: &[S]) -> Classification {
        self.classify_text(&NormalizedText::new(title, description, tags))
    }

    /// Classifies already-normalized text.
    pub fn classify_text(&self, text: &NormalizedText) -> Classification {
        let claims = self.claims(text);
        grouper::group(&self.glossary, claims.iter().map(|claim| claim.term))
    }

    /// Returns the winning claims for `text`, in the order they were made.
    pub fn claims(&self, text: &NormalizedText) -> Vec<Claim<'_>> {
        let mut claims = Vec::new();
        if text.is_empty() {
            return claims;
        }

        let hits = self.index.locate(text.as_str());
        let mut allocator = SpanAllocator::new();

        // Each term appears once in the priority order, so it wins at most once.
        for &position in self.priority.positions() {
            let term = &self.glossary.terms()[position];
            'variants: for &keyword in &self.term_keywords[position] {
                for bytes in hits.spans(keyword) {
                    let span = text.char_span(bytes);
                    if allocator.try_claim(span) {
                        let keyword = self.index.phrase(keyword);
                        debug!("{} claimed {}..{} via {keyword:?}", term.id(), span.start, span.end);
                        claims.push(Claim {
                            term,
                            span,
                            keyword,
                        });
                        break 'variants;
                    }
                    trace!(
                        "{} rejected at {}..{}: already claimed",
                        term.id(),
                        span.start,
                        span.end
                    );
                }
            }
        }

        claims
    }
}

/// Assigns each distinct keyword phrase one id and maps every term to the
/// ids of its variants, in variant order.
///
/// Shared phrases ("smash pass", "matrix", ...) are indexed once.
fn intern_keywords(glossary: &Glossary) -> (Vec<String>, Vec<Vec<usize>>) {
    let mut ids: HashMap<&str, usize> = HashMap::new();
    let mut phrases: Vec<String> = Vec::new();
    let mut term_keywords = Vec::with_capacity(glossary.len());

    for term in glossary.terms() {
        let keyword_ids = term
            .keywords()
            .iter()
            .map(|keyword| {
                *ids.entry(keyword.as_str()).or_insert_with(|| {
                    phrases.push(keyword.clone());
                    phrases.len() - 1
                })
            })
            .collect();
        term_keywords.push(keyword_ids);
    }

    (phrases, term_keywords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glossary::{Category, GlossaryBuilder};

    fn tagger(builder: GlossaryBuilder) -> Tagger {
        Tagger::new(builder.build().unwrap()).unwrap()
    }

    fn winners(tagger: &Tagger, text: &str) -> Vec<String> {
        tagger
            .claims(&NormalizedText::from_raw(text))
            .iter()
            .map(|claim| claim.term.id().to_string())
            .collect()
    }

    fn guard_glossary() -> GlossaryBuilder {
        GlossaryBuilder::new()
            .term("guard", Category::Technique, ["guard"])
            .term("open_guard", Category::GuardType, ["open guard"])
    }

    #[test]
    fn longer_phrase_claims_shared_words() {
        let tagger = tagger(guard_glossary());
        assert_eq!(winners(&tagger, "open guard basics"), vec!["open_guard"]);
    }

    #[test]
    fn shorter_phrase_wins_on_separate_text() {
        let tagger = tagger(guard_glossary());
        assert_eq!(winners(&tagger, "open guard and closed guard"), vec!["open_guard", "guard"]);
        assert_eq!(winners(&tagger, "guard retention"), vec!["guard"]);
    }

    #[test]
    fn term_wins_once_however_often_it_occurs() {
        let tagger = tagger(GlossaryBuilder::new().term("kimura", Category::Submission, ["kimura"]));

        let claims = tagger.claims(&NormalizedText::from_raw("kimura, kimura, kimura"));
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].span, Span::new(0, 6));
    }

    #[test]
    fn later_occurrence_used_when_first_is_taken() {
        let tagger = tagger(
            GlossaryBuilder::new()
                .term("single_leg_x", Category::GuardType, ["single leg x"])
                .term("single_leg", Category::Takedown, ["single leg"]),
        );

        let claims = tagger.claims(&NormalizedText::from_raw("single leg x to single leg"));
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[1].term.id().as_str(), "single_leg");
        assert_eq!(claims[1].span, Span::new(16, 26));
    }

    #[test]
    fn variants_are_tried_in_definition_order() {
        let tagger = tagger(GlossaryBuilder::new().term(
            "rear_naked_choke",
            Category::Submission,
            ["rear naked choke", "rnc"],
        ));

        let claims = tagger.claims(&NormalizedText::from_raw("rnc or rear naked choke"));
        assert_eq!(claims[0].keyword, "rear naked choke");
        assert_eq!(claims[0].span, Span::new(7, 23));
    }

    #[test]
    fn spans_are_character_offsets() {
        let tagger = tagger(GlossaryBuilder::new().term("side_control", Category::Position, ["côté"]));

        let text = NormalizedText::from_raw("Contrôle côté");
        let claims = tagger.claims(&text);
        assert_eq!(claims[0].span, Span::new(9, 13));
        assert_eq!(text.slice(claims[0].span), "côté");
    }

    #[test]
    fn empty_text_has_no_claims() {
        let tagger = Tagger::bundled().unwrap();
        assert!(tagger.claims(&NormalizedText::from_raw("   ")).is_empty());
        assert!(tagger.classify("", "", &[] as &[&str]).is_empty());
    }

    #[test]
    fn builder_defaults_to_bundled_glossary_and_automaton() {
        let tagger = TaggerBuilder::new().build().unwrap();
        assert_eq!(tagger.strategy(), MatchStrategy::Automaton);
        assert_eq!(tagger.glossary().len(), Glossary::bundled().unwrap().len());
    }

    #[test]
    fn strategies_produce_identical_classifications() {
        let automaton = Tagger::bundled().unwrap();
        let scan = TaggerBuilder::new()
            .strategy(MatchStrategy::Scan)
            .build()
            .unwrap();

        for title in [
            "Single Leg X Sweep to back control",
            "Deep half guard waiter sweep",
            "Knee slice pass to mount and armbar",
            "passage de garde et clé de talon",
        ] {
            assert_eq!(
                automaton.classify(title, "", &[] as &[&str]),
                scan.classify(title, "", &[] as &[&str]),
                "strategies disagree on {title:?}"
            );
        }
    }

    #[test]
    fn tagger_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Tagger>();
    }
}
