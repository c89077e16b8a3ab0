//! # Feedo
//!
//! A bot that reads RSS/Atom feeds and posts their newest entries to a
//! subreddit, skipping anything the subreddit already has.
//!
//! ## Architecture
//!
//! One run is a pipeline:
//!
//! ```text
//! History → Fetcher → Normalizer → Dedup → Publisher
//! ```
//!
//! - [`dedup`]: recent subreddit posts and the duplicate filter
//! - [`fetcher`]: concurrent feed fetching with a bounded worker count
//! - [`normalizer`]: feed parsing and title/link extraction
//! - [`publisher`]: sequential submission with per-item error isolation
//! - [`pipeline`]: the run state machine tying the stages together
//!
//! ## Quick Start
//!
//! ```bash
//! # See what would be posted
//! feedo -S rust --dry-run -v
//!
//! # Post for real, with explicit files
//! feedo -S rust -c credentials.toml -s sources.txt -l feedo.log
//! ```

/// Run context, crate error type and the interrupt signal.
///
/// The [`RunContext`](app::RunContext) struct wires together the channel
/// session, fetchers and normalizer for one run.
pub mod app;

/// The channel posts go to.
///
/// - [`Channel`](channel::Channel): async trait for listing and submitting
/// - [`RedditClient`](channel::RedditClient): Reddit OAuth implementation
pub mod channel;

/// Command-line interface using clap.
pub mod cli;

/// Run settings and the TOML credential store.
pub mod config;

/// Duplicate suppression against the subreddit's recent posts.
pub mod dedup;

/// Core domain models.
///
/// - [`FeedSource`](domain::FeedSource) and [`SourceRegistry`](domain::SourceRegistry)
/// - [`Entry`](domain::Entry): a cleaned candidate post
/// - [`RunOutcome`](domain::RunOutcome): per-run tallies and final state
pub mod domain;

/// Feed fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): async trait for retrieving a feed body
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): concurrent fetching with semaphore
pub mod fetcher;

/// Rolling log file plus console output.
pub mod logging;

/// Feed parsing and normalization.
///
/// Parses RSS 0.9x/1.0/2.0, Atom 0.3/1.0 and JSON Feed 1.0 and extracts a
/// cleaned title and link per entry.
pub mod normalizer;

/// The run orchestrator.
pub mod pipeline;

/// Sequential posting to the channel.
pub mod publisher;
