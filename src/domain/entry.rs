use crate::domain::FeedSource;

/// An entry as it came out of the feed parser, before cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
}

impl RawEntry {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            link: Some(link.into()),
        }
    }
}

/// Result of fetching and parsing one source.
#[derive(Debug)]
pub struct ParsedFeed {
    pub source: FeedSource,
    pub result: crate::app::Result<Vec<RawEntry>>,
}

impl ParsedFeed {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// A cleaned candidate post. `link` is the dedup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub link: String,
    pub source: FeedSource,
}
