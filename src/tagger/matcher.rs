use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use aho_corasick::{AhoCorasick, MatchKind};

use super::TaggerError;

/// How keyword occurrences are located in a text.
///
/// Both strategies report the same occurrences; they differ only in cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchStrategy {
    /// One Aho-Corasick pass over the text finds every keyword at once.
    #[default]
    Automaton,
    /// Each keyword is searched for separately, lazily.
    Scan,
}

impl MatchStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStrategy::Automaton => "automaton",
            MatchStrategy::Scan => "scan",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "automaton" => Ok(MatchStrategy::Automaton),
            "scan" => Ok(MatchStrategy::Scan),
            other => Err(format!("unknown match strategy: {other}")),
        }
    }
}

/// Word characters are Unicode alphanumerics and `_`.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Checks that `text[start..end]` is not glued to a word character on either side.
pub(crate) fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Finds whole-word occurrences of `phrase` in `text`, left to right.
///
/// Occurrences never overlap each other: after a hit, the search resumes at
/// its end. Ranges are byte offsets.
///
/// # Examples
///
/// ```
/// use bjj_tagger::tagger::find_whole_words;
///
/// let hits: Vec<_> = find_whole_words("arm drag on the farm, arm bar", "arm").collect();
/// assert_eq!(hits, vec![0..3, 22..25]);
/// ```
pub fn find_whole_words<'a>(text: &'a str, phrase: &'a str) -> WholeWordMatches<'a> {
    WholeWordMatches {
        text,
        phrase,
        cursor: 0,
    }
}

/// Iterator returned by [`find_whole_words`].
#[derive(Debug, Clone)]
pub struct WholeWordMatches<'a> {
    text: &'a str,
    phrase: &'a str,
    cursor: usize,
}

impl Iterator for WholeWordMatches<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.phrase.is_empty() {
            return None;
        }
        while self.cursor <= self.text.len() {
            let start = self.cursor + self.text[self.cursor..].find(self.phrase)?;
            let end = start + self.phrase.len();
            if is_whole_word(self.text, start, end) {
                self.cursor = end;
                return Some(start..end);
            }
            // Step one character so the next search can start inside this hit.
            self.cursor = start + self.text[start..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

/// Distinct keyword phrases of a glossary, addressed by position.
pub(crate) struct KeywordIndex {
    phrases: Vec<String>,
    automaton: Option<AhoCorasick>,
}

impl KeywordIndex {
    pub(crate) fn new(phrases: Vec<String>, strategy: MatchStrategy) -> Result<Self, TaggerError> {
        let automaton = match strategy {
            MatchStrategy::Automaton => Some(
                AhoCorasick::builder()
                    .match_kind(MatchKind::Standard)
                    .build(&phrases)?,
            ),
            MatchStrategy::Scan => None,
        };
        Ok(Self { phrases, automaton })
    }

    pub(crate) fn len(&self) -> usize {
        self.phrases.len()
    }

    pub(crate) fn phrase(&self, keyword: usize) -> &str {
        &self.phrases[keyword]
    }

    /// Prepares per-keyword lookups over one text.
    ///
    /// With an automaton, every whole-word occurrence of every phrase is
    /// collected in a single overlapping pass and bucketed by phrase.
    pub(crate) fn locate<'a>(&'a self, text: &'a str) -> PhraseHits<'a> {
        match &self.automaton {
            Some(automaton) => {
                let mut hits = vec![Vec::new(); self.phrases.len()];
                for found in automaton.find_overlapping_iter(text) {
                    if is_whole_word(text, found.start(), found.end()) {
                        hits[found.pattern().as_usize()].push(found.start()..found.end());
                    }
                }
                PhraseHits::Indexed(hits)
            }
            None => PhraseHits::Scan {
                text,
                phrases: &self.phrases,
            },
        }
    }
}

/// Keyword occurrences for one text, produced by [`KeywordIndex::locate`].
pub(crate) enum PhraseHits<'a> {
    Indexed(Vec<Vec<Range<usize>>>),
    Scan { text: &'a str, phrases: &'a [String] },
}

impl PhraseHits<'_> {
    /// Occurrences of one keyword in the order [`find_whole_words`] yields them.
    pub(crate) fn spans(&self, keyword: usize) -> KeywordSpans<'_> {
        match self {
            PhraseHits::Indexed(hits) => KeywordSpans::Indexed {
                hits: hits[keyword].iter(),
                resume_at: 0,
            },
            PhraseHits::Scan { text, phrases } => {
                KeywordSpans::Scan(find_whole_words(text, &phrases[keyword]))
            }
        }
    }
}

pub(crate) enum KeywordSpans<'a> {
    Indexed {
        hits: std::slice::Iter<'a, Range<usize>>,
        resume_at: usize,
    },
    Scan(WholeWordMatches<'a>),
}

impl Iterator for KeywordSpans<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            // Same phrase, same length: hits are sorted by start. Skip the
            // ones a left-to-right search would have stepped over.
            KeywordSpans::Indexed { hits, resume_at } => {
                let hit = hits.find(|hit| hit.start >= *resume_at)?.clone();
                *resume_at = hit.end;
                Some(hit)
            }
            KeywordSpans::Scan(matches) => matches.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(strategy: MatchStrategy, phrases: &[&str], text: &str) -> Vec<Vec<Range<usize>>> {
        let index =
            KeywordIndex::new(phrases.iter().map(|p| p.to_string()).collect(), strategy).unwrap();
        let hits = index.locate(text);
        (0..index.len()).map(|k| hits.spans(k).collect()).collect()
    }

    #[test]
    fn rejects_partial_word_matches() {
        let hits: Vec<_> = find_whole_words("farm armbar arms", "arm").collect();
        assert!(hits.is_empty());
    }

    #[test]
    fn matches_at_string_edges_and_punctuation() {
        let hits: Vec<_> = find_whole_words("arm, (arm) arm", "arm").collect();
        assert_eq!(hits, vec![0..3, 6..9, 11..14]);
    }

    #[test]
    fn underscore_counts_as_word_character() {
        assert!(find_whole_words("dummy_sweep", "sweep").next().is_none());
    }

    #[test]
    fn accented_letters_are_word_characters() {
        let hits: Vec<_> = find_whole_words("montée monte", "mont").collect();
        assert!(hits.is_empty());

        let hits: Vec<_> = find_whole_words("garde fermée", "garde fermée").collect();
        assert_eq!(hits, vec![0.."garde fermée".len()]);
    }

    #[test]
    fn successive_hits_do_not_overlap() {
        let hits: Vec<_> = find_whole_words("a a a", "a a").collect();
        assert_eq!(hits, vec![0..3]);
    }

    #[test]
    fn search_resumes_inside_rejected_candidate() {
        // "x guard" first appears inside "xx guard", which is not a whole word.
        let hits: Vec<_> = find_whole_words("xx guard x guard", "x guard").collect();
        assert_eq!(hits, vec![9..16]);
    }

    #[test]
    fn strategies_agree() {
        let phrases = ["a a", "guard", "open guard", "x guard", "arm", "côté"];
        let texts = [
            "a a a a",
            "open guard to x guard, then guard",
            "xx guard x guard farm arm",
            "côté côtés côté",
            "",
        ];
        for text in texts {
            assert_eq!(
                collect(MatchStrategy::Automaton, &phrases, text),
                collect(MatchStrategy::Scan, &phrases, text),
                "strategies disagree on {text:?}"
            );
        }
    }

    #[test]
    fn automaton_reports_overlapping_phrases_separately() {
        let hits = collect(
            MatchStrategy::Automaton,
            &["single leg", "single leg x"],
            "single leg x sweep",
        );
        assert_eq!(hits, vec![vec![0..10], vec![0..12]]);
    }

    #[test]
    fn strategy_parses_from_str() {
        assert_eq!("scan".parse::<MatchStrategy>(), Ok(MatchStrategy::Scan));
        assert_eq!(" Automaton ".parse::<MatchStrategy>(), Ok(MatchStrategy::Automaton));
        assert!("regex".parse::<MatchStrategy>().is_err());
    }
}
