//! Vocabulary of grappling terms, their keyword variants and display categories.
//!
//! A [`Glossary`] is built once, validated up front, and only read afterwards.
//! Every configuration defect (duplicate ids, terms without keywords, terms
//! missing from or repeated across category lists) is reported by
//! [`GlossaryError`] at construction time, so classification itself never
//! fails.
//!
//! # Examples
//!
//! ```
//! use bjj_tagger::{Category, Glossary, TermId};
//!
//! let glossary = Glossary::bundled()?;
//! let slx = glossary.get(&TermId::new("single_leg_x")).unwrap();
//!
//! assert_eq!(slx.category(), Category::GuardType);
//! assert!(slx.keywords().iter().any(|k| k == "single leg x"));
//! # Ok::<(), bjj_tagger::GlossaryError>(())
//! ```

mod category;
mod definition;
mod store;
mod term;

pub use category::Category;
pub use definition::{GlossaryBuilder, GlossaryDefinition, TermDefinition};
pub use store::{Glossary, GlossaryError};
pub use term::{Term, TermId};

/// Vocabulary shipped with the crate (English and French variants).
const BUNDLED_GLOSSARY: &str = include_str!("../data/glossary.json");

impl Glossary {
    /// Builds the vocabulary shipped with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled document itself is defective.
    pub fn bundled() -> Result<Self, GlossaryError> {
        Self::from_json_str(BUNDLED_GLOSSARY)
    }
}
