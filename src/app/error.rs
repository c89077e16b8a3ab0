use thiserror::Error;

use crate::channel::ChannelError;
use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum FeedoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Could not load sources from {path}: {source}")]
    Sources {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("Interrupted")]
    Interrupted,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FeedoError>;
