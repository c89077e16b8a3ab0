pub mod http_fetcher;
pub mod parallel;

use async_trait::async_trait;

use crate::app::Result;

/// Retrieves the raw body of a feed.
#[async_trait]
pub trait Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
