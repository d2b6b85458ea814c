//! Where the glossary comes from.
//!
//! # Environment Variables
//!
//! - `BJJ_TAGGER_GLOSSARY`: path to a glossary JSON file, used when no path
//!   is given explicitly.
//!
//! Without either, `{config_dir}/bjj-tagger/glossary.json` is used if it
//! exists, where `config_dir` is:
//! - Linux: `~/.config`
//! - macOS: `~/Library/Application Support`
//! - Windows: `C:\Users\<user>\AppData\Roaming`
//!
//! Otherwise the bundled vocabulary is used.

use std::fmt;
use std::path::{Path, PathBuf};

use log::info;

use crate::glossary::{Glossary, GlossaryError};

/// Environment variable naming a glossary file.
pub const GLOSSARY_ENV: &str = "BJJ_TAGGER_GLOSSARY";

/// Resolved origin of the glossary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlossarySource {
    /// Path given on the command line or by the embedder.
    Explicit(PathBuf),
    /// Path taken from `BJJ_TAGGER_GLOSSARY`.
    Environment(PathBuf),
    /// Per-user glossary in the config directory.
    UserConfig(PathBuf),
    /// Vocabulary compiled into the crate.
    Bundled,
}

impl GlossarySource {
    /// Resolves the source from an explicit path and the process environment.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        Self::resolve_with(
            explicit,
            std::env::var(GLOSSARY_ENV).ok(),
            user_glossary_path(),
        )
    }

    /// Resolves the source from already-gathered inputs, first hit wins.
    ///
    /// A blank environment value is ignored. The user config path is only
    /// used if the file exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use bjj_tagger::GlossarySource;
    /// use std::path::PathBuf;
    ///
    /// let source = GlossarySource::resolve_with(None, Some("terms.json".into()), None);
    /// assert_eq!(source, GlossarySource::Environment(PathBuf::from("terms.json")));
    ///
    /// assert_eq!(GlossarySource::resolve_with(None, None, None), GlossarySource::Bundled);
    /// ```
    pub fn resolve_with(
        explicit: Option<PathBuf>,
        env_value: Option<String>,
        user_path: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = explicit {
            return Self::Explicit(path);
        }
        if let Some(value) = env_value
            && !value.trim().is_empty()
        {
            return Self::Environment(PathBuf::from(value.trim()));
        }
        match user_path {
            Some(path) if path.is_file() => Self::UserConfig(path),
            _ => Self::Bundled,
        }
    }

    /// The file to read, or None for the bundled vocabulary.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Environment(path) | Self::UserConfig(path) => Some(path),
            Self::Bundled => None,
        }
    }

    /// Loads and validates the glossary.
    ///
    /// # Errors
    ///
    /// Returns `GlossaryError` if the file cannot be read or is invalid.
    pub fn load(&self) -> Result<Glossary, GlossaryError> {
        let glossary = match self.path() {
            Some(path) => Glossary::from_path(path)?,
            None => Glossary::bundled()?,
        };
        info!("Loaded {} terms from {self}", glossary.len());
        Ok(glossary)
    }
}

impl fmt::Display for GlossarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "{}", path.display()),
            Self::Environment(path) => write!(f, "{} (from {GLOSSARY_ENV})", path.display()),
            Self::UserConfig(path) => write!(f, "{} (user config)", path.display()),
            Self::Bundled => write!(f, "bundled glossary"),
        }
    }
}

/// Location of the per-user glossary, whether or not it exists.
///
/// Returns None if the platform has no config directory.
pub fn user_glossary_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bjj-tagger").join("glossary.json"))
}

/// Resolves and loads the glossary in one step.
///
/// # Errors
///
/// Returns `GlossaryError` if the resolved file cannot be read or is invalid.
pub fn load_glossary(explicit: Option<PathBuf>) -> Result<Glossary, GlossaryError> {
    GlossarySource::resolve(explicit).load()
}
