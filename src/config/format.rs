//! Commit message format names.

use std::fmt;

use serde::{Serialize, Serializer};

/// Commit message style requested from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommitFormat {
    Conventional,
    Angular,
    Gitmoji,
    Karma,
    Semantic,
    Google,
    Custom,
    /// A name this build does not know; passed to the backend verbatim.
    Other(String),
}

impl CommitFormat {
    /// Every named format, in the order they are documented.
    pub const KNOWN: [CommitFormat; 7] = [
        CommitFormat::Conventional,
        CommitFormat::Angular,
        CommitFormat::Gitmoji,
        CommitFormat::Karma,
        CommitFormat::Semantic,
        CommitFormat::Google,
        CommitFormat::Custom,
    ];

    /// Parse a format name. Unknown names are kept, never rejected.
    pub fn from_name(name: &str) -> Self {
        match name {
            "conventional" => CommitFormat::Conventional,
            "angular" => CommitFormat::Angular,
            "gitmoji" => CommitFormat::Gitmoji,
            "karma" => CommitFormat::Karma,
            "semantic" => CommitFormat::Semantic,
            "google" => CommitFormat::Google,
            "custom" => CommitFormat::Custom,
            other => CommitFormat::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CommitFormat::Conventional => "conventional",
            CommitFormat::Angular => "angular",
            CommitFormat::Gitmoji => "gitmoji",
            CommitFormat::Karma => "karma",
            CommitFormat::Semantic => "semantic",
            CommitFormat::Google => "google",
            CommitFormat::Custom => "custom",
            CommitFormat::Other(name) => name,
        }
    }
}

impl fmt::Display for CommitFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CommitFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
