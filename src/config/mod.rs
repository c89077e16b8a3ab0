//! Run parameters and the credential store.
//!
//! [`RunSettings`] is built from the command line once per run;
//! [`Credentials`] is read from a TOML file at `credentials_path`.

pub mod credentials;

pub use credentials::Credentials;

use std::path::PathBuf;
use std::time::Duration;

use crate::fetcher::parallel::DEFAULT_WORKERS;

pub const DEFAULT_ENTRIES_PER_SOURCE: usize = 5;
pub const DEFAULT_HISTORY_LIMIT: usize = 100;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Everything one run needs to know, resolved and validated.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Subreddit to post to, without the `r/` prefix.
    pub destination: String,
    pub dry_run: bool,
    pub verbose: bool,
    pub log_file: PathBuf,
    pub credentials_path: PathBuf,
    pub sources_path: PathBuf,
    /// Only the first N entries of each feed are considered.
    pub entries_per_source: usize,
    /// Maximum concurrent feed fetches.
    pub workers: usize,
    /// Size of the dedup window loaded from the channel.
    pub history_limit: usize,
    pub fetch_timeout: Duration,
}

impl RunSettings {
    pub fn new(destination: impl Into<String>) -> Self {
        let config_dir = Self::default_config_dir();
        Self {
            destination: destination.into(),
            dry_run: false,
            verbose: false,
            log_file: Self::default_data_dir().join("feedo.log"),
            credentials_path: config_dir.join("credentials.toml"),
            sources_path: config_dir.join("sources.txt"),
            entries_per_source: DEFAULT_ENTRIES_PER_SOURCE,
            workers: DEFAULT_WORKERS,
            history_limit: DEFAULT_HISTORY_LIMIT,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }

    /// Normalize and check the settings. The destination is required.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let destination = self.destination.trim();
        let destination = destination
            .strip_prefix("/r/")
            .or_else(|| destination.strip_prefix("r/"))
            .unwrap_or(destination)
            .trim_end_matches('/');
        if destination.is_empty() {
            return Err(ConfigError::Invalid("You must specify a subreddit".into()));
        }
        self.destination = destination.to_string();

        if self.entries_per_source == 0 {
            return Err(ConfigError::Invalid(
                "Entries per source must be at least 1".into(),
            ));
        }
        if self.workers == 0 {
            return Err(ConfigError::Invalid("Workers must be at least 1".into()));
        }
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid(
                "History window must be at least 1".into(),
            ));
        }

        Ok(self)
    }

    /// `~/.config/feedo`, or the working directory when there is no config dir.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("feedo"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// `~/.local/share/feedo`, or the working directory.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .map(|d| d.join("feedo"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid settings: {0}")]
    Invalid(String),

    #[error("Could not read credentials from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not parse credentials file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("The file {path} does not hold valid credentials: missing {key}")]
    MissingKey { path: PathBuf, key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = RunSettings::new("rust");
        assert_eq!(settings.entries_per_source, 5);
        assert_eq!(settings.workers, 5);
        assert_eq!(settings.history_limit, 100);
        assert!(!settings.dry_run);
        assert!(settings.credentials_path.ends_with("credentials.toml"));
        assert!(settings.sources_path.ends_with("sources.txt"));
        assert!(settings.log_file.ends_with("feedo.log"));
    }

    #[test]
    fn test_validate_strips_prefix() {
        let settings = RunSettings::new(" r/rust/ ").validate().unwrap();
        assert_eq!(settings.destination, "rust");
        let settings = RunSettings::new("/r/programming").validate().unwrap();
        assert_eq!(settings.destination, "programming");
    }

    #[test]
    fn test_validate_requires_destination() {
        assert!(matches!(
            RunSettings::new("   ").validate(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RunSettings::new("r/").validate(),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        let mut settings = RunSettings::new("rust");
        settings.entries_per_source = 0;
        assert!(settings.validate().is_err());

        let mut settings = RunSettings::new("rust");
        settings.workers = 0;
        assert!(settings.validate().is_err());
    }
}
