//! Keyword tagging of video metadata against a [`Glossary`](crate::Glossary).
//!
//! Classification runs in four stages:
//!
//! 1. [`NormalizedText`] joins and lowercases the record's text fields.
//! 2. [`PriorityOrder`] ranks terms so that specific phrases are tried first.
//! 3. Each term's keyword variants are located as whole words, and the first
//!    occurrence that does not overlap an earlier claim is recorded by the
//!    [`SpanAllocator`].
//! 4. Winning terms are grouped into a [`Classification`] by category.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```
//! use bjj_tagger::Tagger;
//!
//! let tagger = Tagger::bundled()?;
//! let classification = tagger.classify(
//!     "Berimbolo to back take finishing with a heel hook",
//!     "",
//!     &[] as &[&str],
//! );
//!
//! let json = serde_json::to_string(&classification)?;
//! assert_eq!(
//!     json,
//!     r#"{"guard_type":["🌀 Berimbolo Position"],"position":["Back Control"],"submission":["Heel Hook"]}"#
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Whole-word search
//!
//! ```
//! use bjj_tagger::tagger::find_whole_words;
//!
//! let hits: Vec<_> = find_whole_words("guardian of the guard", "guard").collect();
//! assert_eq!(hits, vec![16..21]);
//! ```

mod allocator;
mod classifier;
mod eval;
mod grouper;
mod matcher;
mod ranker;
mod text;

pub use allocator::SpanAllocator;
pub use classifier::{Claim, Tagger, TaggerBuilder, TaggerError};
pub use eval::{
    CorpusEntry, EntryScore, EvalError, EvalReport, compare_classifications, evaluate,
    jaccard_similarity, label_set, load_corpus, precision_recall,
};
pub use grouper::Classification;
pub use matcher::{MatchStrategy, WholeWordMatches, find_whole_words};
pub use ranker::PriorityOrder;
pub use text::{NormalizedText, Span};
