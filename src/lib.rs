pub mod batch;
pub mod config;
pub mod glossary;
pub mod record;
pub mod tagger;

pub use batch::{BatchOptions, BatchStats, classify_batch, read_records, write_records};
pub use config::{GlossarySource, load_glossary};
pub use glossary::{Category, Glossary, GlossaryBuilder, GlossaryError, Term, TermId};
pub use record::{FieldSelection, TextFields, attach_classification};
pub use tagger::{
    Claim, Classification, MatchStrategy, NormalizedText, PriorityOrder, Span, SpanAllocator,
    Tagger, TaggerBuilder, TaggerError,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagger_accessible_from_crate_root() {
        let tagger = Tagger::bundled();
        assert!(tagger.is_ok());
    }

    #[test]
    fn types_accessible_from_crate_root() {
        let glossary = GlossaryBuilder::new()
            .term("mount", Category::Position, ["mount"])
            .build()
            .unwrap();
        assert_eq!(glossary.get(&TermId::new("mount")).unwrap().label(), "Mount");

        let strategy: MatchStrategy = "scan".parse().unwrap();
        assert_eq!(format!("{}", strategy), "scan");

        let text = NormalizedText::new("Mount", "", &[] as &[&str]);
        assert_eq!(text.slice(Span::new(0, 5)), "mount");

        let classification = Classification::default();
        assert!(classification.is_empty());

        assert_eq!(BatchOptions::default().fields, FieldSelection::All);
    }
}
