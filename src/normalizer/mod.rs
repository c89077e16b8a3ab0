use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::{FeedoError, Result};
use crate::config::DEFAULT_ENTRIES_PER_SOURCE;
use crate::domain::{Entry, ParsedFeed, RawEntry};

/// Parse an RSS/Atom/JSON feed body into its entries, in document order.
pub fn parse_feed(body: &[u8]) -> Result<Vec<RawEntry>> {
    let feed = parser::parse(body).map_err(|e| FeedoError::FeedParse(e.to_string()))?;

    Ok(feed
        .entries
        .into_iter()
        .map(|entry| RawEntry {
            title: entry.title.map(|t| t.content),
            link: entry.links.into_iter().next().map(|l| l.href),
        })
        .collect())
}

/// Collapse every run of whitespace (newlines included) to one space.
pub fn clean_title(title: &str) -> String {
    decode_html_entities(title)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turns parsed feeds into cleaned [`Entry`] values.
#[derive(Clone)]
pub struct Normalizer {
    entries_per_source: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_ENTRIES_PER_SOURCE)
    }
}

/// Entries extracted from one feed plus how many were dropped as malformed.
#[derive(Debug, Default)]
pub struct Normalized {
    pub entries: Vec<Entry>,
    pub malformed: usize,
}

impl Normalizer {
    pub fn new(entries_per_source: usize) -> Self {
        Self { entries_per_source }
    }

    /// Extract the first `entries_per_source` entries of a successfully
    /// fetched feed. Failed feeds yield nothing. Entries without a title or
    /// link are skipped.
    pub fn normalize(&self, feed: &ParsedFeed) -> Normalized {
        let Ok(raw_entries) = &feed.result else {
            return Normalized::default();
        };

        let mut normalized = Normalized::default();
        for (position, raw) in raw_entries.iter().take(self.entries_per_source).enumerate() {
            let title = raw.title.as_deref().map(clean_title).unwrap_or_default();
            let link = raw.link.as_deref().map(str::trim).unwrap_or_default();

            if title.is_empty() || link.is_empty() {
                tracing::warn!(
                    "Skipping entry #{} of {}: missing {}",
                    position + 1,
                    feed.source,
                    if title.is_empty() { "title" } else { "link" }
                );
                normalized.malformed += 1;
                continue;
            }

            normalized.entries.push(Entry {
                title,
                link: link.to_string(),
                source: feed.source.clone(),
            });
        }

        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FeedSource;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <description>A test feed</description>
    <item>
      <title>Test
        Item   1</title>
      <link>https://example.com/item1</link>
      <guid>item-1</guid>
    </item>
    <item>
      <title>Test Item 2</title>
      <link>https://example.com/item2</link>
      <guid>item-2</guid>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Test Feed</title>
  <entry>
    <title>Atom Entry 1</title>
    <link href="https://example.com/atom1"/>
    <id>atom-entry-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

    fn parsed(entries: Vec<RawEntry>) -> ParsedFeed {
        ParsedFeed {
            source: FeedSource::new("https://example.com/feed.xml"),
            result: Ok(entries),
        }
    }

    #[test]
    fn test_parse_rss() {
        let entries = parse_feed(RSS_SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].title, Some("Test Item 2".into()));
        assert_eq!(entries[0].link, Some("https://example.com/item1".into()));
    }

    #[test]
    fn test_parse_atom() {
        let entries = parse_feed(ATOM_SAMPLE.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, Some("Atom Entry 1".into()));
        assert_eq!(entries[0].link, Some("https://example.com/atom1".into()));
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = parse_feed(b"<html><body>not a feed</body></html>").unwrap_err();
        assert!(matches!(err, FeedoError::FeedParse(_)));
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("  Hello\n\tworld  "), "Hello world");
        assert_eq!(clean_title("Rust &amp; Go"), "Rust & Go");
        assert_eq!(clean_title("\n \n"), "");
    }

    #[test]
    fn test_normalize_collapses_title_whitespace() {
        let entries = parse_feed(RSS_SAMPLE.as_bytes()).unwrap();
        let normalized = Normalizer::default().normalize(&parsed(entries));
        assert_eq!(normalized.entries[0].title, "Test Item 1");
        assert_eq!(normalized.entries[0].link, "https://example.com/item1");
    }

    #[test]
    fn test_normalize_caps_entries() {
        let raw: Vec<RawEntry> = (0..8)
            .map(|i| RawEntry::new(format!("T{}", i), format!("https://example.com/{}", i)))
            .collect();
        let normalized = Normalizer::new(5).normalize(&parsed(raw));

        let titles: Vec<_> = normalized.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["T0", "T1", "T2", "T3", "T4"]);
    }

    #[test]
    fn test_normalize_skips_malformed() {
        let raw = vec![
            RawEntry {
                title: None,
                link: Some("https://example.com/a".into()),
            },
            RawEntry {
                title: Some("No link".into()),
                link: None,
            },
            RawEntry::new("   ", "https://example.com/blank"),
            RawEntry::new("Good", "https://example.com/good"),
        ];
        let normalized = Normalizer::default().normalize(&parsed(raw));

        assert_eq!(normalized.malformed, 3);
        assert_eq!(normalized.entries.len(), 1);
        assert_eq!(normalized.entries[0].title, "Good");
    }

    #[test]
    fn test_normalize_failed_feed_is_empty() {
        let feed = ParsedFeed {
            source: FeedSource::new("https://example.com/feed.xml"),
            result: Err(FeedoError::FeedParse("bad".into())),
        };
        let normalized = Normalizer::default().normalize(&feed);
        assert!(normalized.entries.is_empty());
        assert_eq!(normalized.malformed, 0);
    }
}
