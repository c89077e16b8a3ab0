use std::sync::Arc;

use crate::app::{Result, Shutdown};
use crate::channel::{Channel, RedditClient, RedditEndpoints};
use crate::config::{Credentials, RunSettings};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::ParallelFetcher;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;

/// Everything a run shares: settings, the channel session, the fetchers and
/// the interrupt signal. Built once, then passed by reference.
pub struct RunContext {
    pub settings: RunSettings,
    pub channel: Arc<dyn Channel>,
    pub parallel_fetcher: ParallelFetcher,
    pub normalizer: Normalizer,
    pub shutdown: Shutdown,
}

impl RunContext {
    /// Read the credentials and open a Reddit session.
    pub async fn connect(settings: RunSettings, shutdown: Shutdown) -> Result<Self> {
        tracing::debug!(
            "Reading credentials from {}.",
            settings.credentials_path.display()
        );
        let credentials = Credentials::load(&settings.credentials_path)?;
        let channel =
            RedditClient::login(&credentials, RedditEndpoints::default(), settings.fetch_timeout)
                .await?;
        let fetcher = Arc::new(HttpFetcher::with_timeout(settings.fetch_timeout)?);

        Ok(Self::with_parts(settings, Arc::new(channel), fetcher, shutdown))
    }

    pub fn with_parts(
        settings: RunSettings,
        channel: Arc<dyn Channel>,
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        shutdown: Shutdown,
    ) -> Self {
        let parallel_fetcher = ParallelFetcher::with_workers(fetcher, settings.workers);
        let normalizer = Normalizer::new(settings.entries_per_source);

        Self {
            settings,
            channel,
            parallel_fetcher,
            normalizer,
            shutdown,
        }
    }
}
