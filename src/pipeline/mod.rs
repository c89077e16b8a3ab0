//! One run of the bot: load history, fetch feeds, normalize, filter, publish.
//!
//! ```text
//! Idle → Loading → Fetching → Normalizing → Filtering → Publishing → Done
//!           ↓                                                   (Interrupted)
//!        Failed
//! ```
//!
//! Only `Loading` can fail the run. Everything after it degrades: failed
//! sources contribute nothing, rejected posts are skipped, and an interrupt
//! ends the run without undoing what was already posted.

use crate::app::{FeedoError, RunContext, Shutdown};
use crate::config::RunSettings;
use crate::dedup::{self, HistorySet, Seen};
use crate::domain::{RunOutcome, RunState, SourceRegistry};
use crate::publisher::{PublishAbort, Publisher};

/// Open the channel session and run the pipeline. Never panics or errors:
/// every failure ends up in the returned [`RunOutcome`].
pub async fn execute(settings: RunSettings, shutdown: Shutdown) -> RunOutcome {
    let mut outcome = RunOutcome::new();
    outcome.advance(RunState::Loading);

    let connected = tokio::select! {
        biased;
        _ = shutdown.triggered() => return outcome.interrupt(),
        connected = RunContext::connect(settings, shutdown.clone()) => connected,
    };

    match connected {
        Ok(ctx) => Pipeline::new(&ctx).resume(outcome).await,
        Err(e) => {
            tracing::error!("Could not start: {}", e);
            outcome.fail(e.to_string())
        }
    }
}

pub struct Pipeline<'a> {
    ctx: &'a RunContext,
}

impl<'a> Pipeline<'a> {
    pub fn new(ctx: &'a RunContext) -> Self {
        Self { ctx }
    }

    /// Run every stage against an already connected context.
    pub async fn run(&self) -> RunOutcome {
        let mut outcome = RunOutcome::new();
        outcome.advance(RunState::Loading);
        self.resume(outcome).await
    }

    async fn resume(&self, mut outcome: RunOutcome) -> RunOutcome {
        let settings = &self.ctx.settings;
        let shutdown = &self.ctx.shutdown;

        tracing::debug!("Loading last {} posts.", settings.history_limit);
        let history = tokio::select! {
            biased;
            _ = shutdown.triggered() => return outcome.interrupt(),
            history = HistorySet::load(
                self.ctx.channel.as_ref(),
                &settings.destination,
                settings.history_limit,
            ) => history,
        };
        let history = match history {
            Ok(history) => history,
            Err(e) => {
                tracing::error!("Something went wrong over at Reddit: {}", e);
                return outcome.fail(format!("could not load history: {}", e));
            }
        };
        tracing::debug!(
            "Loaded {} recent posts from r/{}.",
            history.len(),
            settings.destination
        );

        tracing::debug!("Loading sources.");
        let registry = match SourceRegistry::load(&settings.sources_path) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::error!("{}", e);
                return outcome.fail(e.to_string());
            }
        };

        outcome.advance(RunState::Fetching);
        tracing::debug!("Polling {} feeds.", registry.len());
        let feeds = match self
            .ctx
            .parallel_fetcher
            .fetch_all(registry.sources(), shutdown)
            .await
        {
            Ok(feeds) => feeds,
            Err(FeedoError::Interrupted) => return outcome.interrupt(),
            Err(e) => {
                tracing::error!("An error occurred while polling feeds: {}", e);
                Vec::new()
            }
        };
        outcome.sources_fetched = feeds.iter().filter(|f| f.is_ok()).count();
        outcome.sources_failed = registry.len().saturating_sub(outcome.sources_fetched);

        outcome.advance(RunState::Normalizing);
        let mut entries = Vec::new();
        for feed in &feeds {
            let normalized = self.ctx.normalizer.normalize(feed);
            outcome.entries_malformed += normalized.malformed;
            entries.extend(normalized.entries);
        }
        outcome.entries_considered = entries.len();

        outcome.advance(RunState::Filtering);
        let partition = dedup::partition(&history, entries);
        outcome.entries_duplicate = partition.seen.len();
        let repeated_in_run = partition
            .seen
            .iter()
            .filter(|(_, seen)| *seen == Seen::ThisRun)
            .count();
        tracing::debug!(
            "{} new entries, {} already posted, {} repeated across feeds.",
            partition.fresh.len(),
            outcome.entries_duplicate - repeated_in_run,
            repeated_in_run
        );

        outcome.advance(RunState::Publishing);
        tracing::debug!("Preparing to post.");
        let report = Publisher::new(
            self.ctx.channel.as_ref(),
            &settings.destination,
            settings.dry_run,
        )
        .publish(&partition.fresh, shutdown)
        .await;
        outcome.entries_published = report.published;
        outcome.publish_rejected = report.rejected;
        outcome.publish_failed = report.failed;

        match report.aborted {
            Some(PublishAbort::Interrupted) => return outcome.interrupt(),
            Some(PublishAbort::SessionLost(_)) => outcome.session_lost = true,
            None => {}
        }

        outcome.advance(RunState::Done);
        tracing::info!(
            "Completed: {} of {} feeds fetched, {} entries considered, {} posted, {} duplicates, {} errors ({:.1}s)",
            outcome.sources_fetched,
            registry.len(),
            outcome.entries_considered,
            outcome.entries_published,
            outcome.entries_duplicate,
            outcome.non_fatal_errors(),
            outcome.elapsed_secs()
        );
        outcome
    }
}
