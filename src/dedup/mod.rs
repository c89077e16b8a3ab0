//! Duplicate suppression.
//!
//! [`HistorySet`] holds the links already posted to the channel (bounded to
//! the most recent N). [`partition`] splits a run's entries into new ones and
//! ones already seen, either in the history or earlier in the same run.

use std::collections::HashSet;

use crate::channel::{Channel, ChannelError};
use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::domain::Entry;

/// Links of the most recent publications on the channel.
#[derive(Debug, Clone, Default)]
pub struct HistorySet {
    links: HashSet<String>,
}

impl HistorySet {
    /// Keep at most `capacity` links, taking them in the given (newest first)
    /// order.
    pub fn from_recent<I, S>(links: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            links: links.into_iter().take(capacity).map(Into::into).collect(),
        }
    }

    /// Build the history from the channel's own record of `destination`.
    pub async fn load(
        channel: &dyn Channel,
        destination: &str,
        limit: usize,
    ) -> Result<Self, ChannelError> {
        let links = channel.recent_links(destination, limit).await?;
        Ok(Self::from_recent(links, limit))
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }
}

impl<S: Into<String>> FromIterator<S> for HistorySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_recent(iter, DEFAULT_HISTORY_LIMIT)
    }
}

/// Why an entry was held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seen {
    /// Already on the channel when the run started.
    History,
    /// An earlier entry in this run has the same link.
    ThisRun,
}

#[derive(Debug, Default)]
pub struct Partition {
    pub fresh: Vec<Entry>,
    pub seen: Vec<(Entry, Seen)>,
}

/// Split `entries` into new and already-seen, preserving order. Links match
/// exactly. The first entry with a given link wins; later ones count as seen.
pub fn partition(history: &HistorySet, entries: Vec<Entry>) -> Partition {
    let mut run_links = HashSet::new();
    let mut result = Partition::default();

    for entry in entries {
        if history.contains(&entry.link) {
            tracing::debug!("Already posted: {}", entry.title);
            result.seen.push((entry, Seen::History));
        } else if !run_links.insert(entry.link.clone()) {
            tracing::debug!("Already queued this run: {}", entry.title);
            result.seen.push((entry, Seen::ThisRun));
        } else {
            result.fresh.push(entry);
        }
    }

    result
}
