use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::app::{FeedoError, Result, Shutdown};
use crate::domain::{FeedSource, ParsedFeed, RawEntry};
use crate::fetcher::Fetcher;
use crate::normalizer;

pub const DEFAULT_WORKERS: usize = 5;

/// Fetches many sources concurrently, at most `workers` at a time.
pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher + Send + Sync>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Fetch and parse every source, one [`ParsedFeed`] per source in
    /// completion order. A failing source yields a failed `ParsedFeed`; it
    /// never fails the call. Returns [`FeedoError::Interrupted`] as soon as
    /// `shutdown` fires, aborting whatever is still in flight.
    pub async fn fetch_all(
        &self,
        sources: &[FeedSource],
        shutdown: &Shutdown,
    ) -> Result<Vec<ParsedFeed>> {
        let (tx, mut rx) = mpsc::channel(sources.len().max(1));
        let mut tasks = JoinSet::new();
        let mut pending: Vec<FeedSource> = sources.to_vec();

        for source in sources.iter().cloned() {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();
            let tx = tx.clone();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };

                let result = fetch_single_feed(fetcher.as_ref(), &source).await;
                let _ = tx.send(ParsedFeed { source, result }).await;
            });
        }
        drop(tx);

        let mut feeds = Vec::with_capacity(sources.len());
        loop {
            tokio::select! {
                biased;
                _ = shutdown.triggered() => {
                    tasks.abort_all();
                    tracing::info!("Caught interrupt while polling feeds: abandoning {} fetches", tasks.len());
                    return Err(FeedoError::Interrupted);
                }
                received = rx.recv() => match received {
                    Some(feed) => {
                        match &feed.result {
                            Ok(entries) => {
                                tracing::debug!("Fetched {} entries from {}", entries.len(), feed.source)
                            }
                            Err(e) => tracing::warn!("Could not fetch {}: {}", feed.source, e),
                        }
                        if let Some(i) = pending.iter().position(|s| *s == feed.source) {
                            pending.swap_remove(i);
                        }
                        feeds.push(feed);
                    }
                    None => break,
                },
            }
        }

        // Every sender is gone, so each task has finished. Sources that never
        // reported belong to tasks that panicked.
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Task join error: {}", e);
            }
        }
        for source in pending {
            feeds.push(ParsedFeed {
                source,
                result: Err(FeedoError::Other("fetch task failed".into())),
            });
        }

        Ok(feeds)
    }
}

async fn fetch_single_feed(
    fetcher: &(dyn Fetcher + Send + Sync),
    source: &FeedSource,
) -> Result<Vec<RawEntry>> {
    let body = fetcher.fetch(source.as_str()).await?;
    normalizer::parse_feed(&body)
}
