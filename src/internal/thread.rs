use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Topic threads offered by the news provider.
///
/// `All` is the sentinel for an unfiltered feed; every other variant maps to a
/// provider `topic` query value. Declaration order is the tab order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Thread {
    #[default]
    All,
    World,
    Nation,
    Business,
    Technology,
    Entertainment,
    Sports,
    Science,
    Health,
}

impl Thread {
    /// Lowercase key used in article identifiers and thread tags.
    pub fn key(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::World => "world",
            Self::Nation => "nation",
            Self::Business => "business",
            Self::Technology => "technology",
            Self::Entertainment => "entertainment",
            Self::Sports => "sports",
            Self::Science => "science",
            Self::Health => "health",
        }
    }

    /// Provider topic filter, `None` for the unfiltered feed.
    pub fn topic(&self) -> Option<&'static str> {
        match self {
            Self::All => None,
            other => Some(other.key()),
        }
    }

    /// Title shown on the thread tab.
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::World => "World",
            Self::Nation => "Nation",
            Self::Business => "Business",
            Self::Technology => "Technology",
            Self::Entertainment => "Entertainment",
            Self::Sports => "Sports",
            Self::Science => "Science",
            Self::Health => "Health",
        }
    }

    pub fn index(&self) -> usize {
        Self::iter().position(|t| t == *self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    pub fn next(&self) -> Self {
        let count = Self::iter().count();
        Self::from_index((self.index() + 1) % count).unwrap_or_default()
    }

    pub fn prev(&self) -> Self {
        let count = Self::iter().count();
        Self::from_index((self.index() + count - 1) % count).unwrap_or_default()
    }
}
