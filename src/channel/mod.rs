//! The content channel entries are published to.
//!
//! - [`Channel`]: async trait the pipeline talks to
//! - [`reddit::RedditClient`]: OAuth-authenticated Reddit implementation

pub mod reddit;

use async_trait::async_trait;
use thiserror::Error;

pub use reddit::{RedditClient, RedditEndpoints};

/// Errors from the channel, classified by who is at fault.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// The platform rejected the call: validation, quota, duplicate, rate limit.
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    /// The request we built was invalid.
    #[error("Client error: {0}")]
    Client(String),

    /// The credentials or token were refused; no further call can succeed.
    #[error("Session unusable: {0}")]
    SessionLost(String),

    /// Network or protocol failure talking to the platform.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ChannelError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Whether the session itself is gone and the run should stop publishing.
    pub fn is_session_lost(&self) -> bool {
        matches!(self, ChannelError::SessionLost(_))
    }

    /// Whether the platform rejected this particular call.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ChannelError::Api { .. })
    }
}

#[async_trait]
pub trait Channel: Send + Sync {
    /// Links of the most recent `limit` posts in `destination`, newest first.
    async fn recent_links(&self, destination: &str, limit: usize)
        -> Result<Vec<String>, ChannelError>;

    /// Submit a link post.
    async fn submit(&self, destination: &str, title: &str, link: &str)
        -> Result<(), ChannelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let api = ChannelError::api("RATELIMIT", "you are doing that too much");
        assert!(api.is_rejection());
        assert!(!api.is_session_lost());

        let lost = ChannelError::SessionLost("401 Unauthorized".into());
        assert!(lost.is_session_lost());
        assert!(!lost.is_rejection());

        let client = ChannelError::Client("bad request".into());
        assert!(!client.is_session_lost());
        assert!(!client.is_rejection());
    }

    #[test]
    fn test_api_error_display() {
        let err = ChannelError::api("ALREADY_SUB", "that link has already been submitted");
        assert_eq!(
            err.to_string(),
            "API error ALREADY_SUB: that link has already been submitted"
        );
    }
}
