use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Display bucket a term belongs to.
///
/// The set is closed. Declaration order is the order categories appear in a
/// [`Classification`](crate::Classification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    GuardType,
    Position,
    Pass,
    Sweep,
    Submission,
    Technique,
    Takedown,
}

impl Category {
    /// Every category, in output order.
    pub const ALL: [Category; 7] = [
        Category::GuardType,
        Category::Position,
        Category::Pass,
        Category::Sweep,
        Category::Submission,
        Category::Technique,
        Category::Takedown,
    ];

    /// Returns the snake_case name used in JSON documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::GuardType => "guard_type",
            Category::Position => "position",
            Category::Pass => "pass",
            Category::Sweep => "sweep",
            Category::Submission => "submission",
            Category::Technique => "technique",
            Category::Takedown => "takedown",
        }
    }

    /// Whether labels in this category carry the term's symbol prefix.
    pub fn shows_symbol(self) -> bool {
        matches!(self, Category::GuardType)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Parses the snake_case name; kebab-case is accepted as well.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}
