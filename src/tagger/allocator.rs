use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included, Unbounded};

use super::Span;

/// Records which parts of a text have been claimed during one classification.
///
/// Claimed spans never overlap, so they are kept keyed by start; checking a
/// candidate only needs its two neighbours.
#[derive(Debug, Default)]
pub struct SpanAllocator {
    claimed: BTreeMap<usize, usize>,
}

impl SpanAllocator {
    /// Creates an allocator with nothing claimed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `span` unless it overlaps an earlier claim.
    ///
    /// Returns true if the span was recorded.
    ///
    /// # Examples
    ///
    /// ```
    /// use bjj_tagger::{Span, SpanAllocator};
    ///
    /// let mut allocator = SpanAllocator::new();
    /// assert!(allocator.try_claim(Span::new(0, 12)));
    /// assert!(!allocator.try_claim(Span::new(0, 10)));
    /// assert!(allocator.try_claim(Span::new(13, 18)));
    /// ```
    pub fn try_claim(&mut self, span: Span) -> bool {
        let before = self
            .claimed
            .range((Unbounded, Included(span.start)))
            .next_back();
        if let Some((&start, &end)) = before
            && span.overlaps(&Span::new(start, end))
        {
            return false;
        }

        let after = self.claimed.range((Excluded(span.start), Unbounded)).next();
        if let Some((&start, &end)) = after
            && span.overlaps(&Span::new(start, end))
        {
            return false;
        }

        self.claimed.insert(span.start, span.end);
        true
    }

    /// Returns the claimed spans ordered by start.
    pub fn claimed(&self) -> impl Iterator<Item = Span> + '_ {
        self.claimed.iter().map(|(&start, &end)| Span::new(start, end))
    }

    /// Number of claimed spans.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Returns true if nothing has been claimed.
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
