use std::path::PathBuf;

use clap::Parser;

use crate::config::{
    ConfigError, RunSettings, DEFAULT_ENTRIES_PER_SOURCE, DEFAULT_FETCH_TIMEOUT_SECS,
    DEFAULT_HISTORY_LIMIT,
};
use crate::fetcher::parallel::DEFAULT_WORKERS;

#[derive(Parser, Debug)]
#[command(name = "feedo", version)]
#[command(about = "A bot for reddit that posts content from RSS feeds", long_about = None)]
pub struct Cli {
    /// Subreddit where you want to post
    #[arg(short = 'S', long, env = "FEEDO_SUBREDDIT")]
    pub subreddit: String,

    /// Only log what would be posted: don't post to Reddit
    #[arg(short = 'n', long = "dry-run", env = "FEEDO_DRY_RUN")]
    pub dry_run: bool,

    /// Print debugging messages to the console
    #[arg(short, long)]
    pub verbose: bool,

    /// Log file for this bot
    #[arg(short = 'l', long, env = "FEEDO_LOGFILE")]
    pub logfile: Option<PathBuf>,

    /// Credentials file for this bot
    #[arg(short = 'c', long, env = "FEEDO_CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// File containing the feeds, one per line
    #[arg(short = 's', long, env = "FEEDO_SOURCES")]
    pub sources: Option<PathBuf>,

    /// Number of entries per feed to consider
    #[arg(short = 'N', long, default_value_t = DEFAULT_ENTRIES_PER_SOURCE, env = "FEEDO_ENTRIES")]
    pub entries: usize,

    /// Number of feeds fetched in parallel
    #[arg(short, long, default_value_t = DEFAULT_WORKERS, env = "FEEDO_WORKERS")]
    pub workers: usize,

    /// Number of recent posts checked for duplicates
    #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT, env = "FEEDO_HISTORY")]
    pub history: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS, env = "FEEDO_TIMEOUT")]
    pub timeout: u64,
}

impl Cli {
    /// Resolve defaults and validate into [`RunSettings`].
    pub fn into_settings(self) -> Result<RunSettings, ConfigError> {
        let mut settings = RunSettings::new(self.subreddit);
        settings.dry_run = self.dry_run;
        settings.verbose = self.verbose;
        if let Some(logfile) = self.logfile {
            settings.log_file = logfile;
        }
        if let Some(credentials) = self.credentials {
            settings.credentials_path = credentials;
        }
        if let Some(sources) = self.sources {
            settings.sources_path = sources;
        }
        settings.entries_per_source = self.entries;
        settings.workers = self.workers;
        settings.history_limit = self.history;
        settings.fetch_timeout = std::time::Duration::from_secs(self.timeout);
        settings.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::try_parse_from([
            "feedo", "-S", "rust", "-n", "-v", "-l", "/tmp/feedo.log", "-c", "/tmp/creds.toml",
            "-s", "/tmp/sources.txt", "-N", "3",
        ])
        .unwrap();
        let settings = cli.into_settings().unwrap();

        assert_eq!(settings.destination, "rust");
        assert!(settings.dry_run);
        assert!(settings.verbose);
        assert_eq!(settings.log_file, PathBuf::from("/tmp/feedo.log"));
        assert_eq!(settings.credentials_path, PathBuf::from("/tmp/creds.toml"));
        assert_eq!(settings.sources_path, PathBuf::from("/tmp/sources.txt"));
        assert_eq!(settings.entries_per_source, 3);
    }

    #[test]
    fn test_defaults() {
        let settings = Cli::try_parse_from(["feedo", "--subreddit", "r/rust"])
            .unwrap()
            .into_settings()
            .unwrap();
        assert_eq!(settings.destination, "rust");
        assert_eq!(settings.entries_per_source, DEFAULT_ENTRIES_PER_SOURCE);
        assert_eq!(settings.workers, DEFAULT_WORKERS);
        assert_eq!(settings.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(!settings.dry_run);
    }

    #[test]
    fn test_zero_entries_rejected() {
        let cli = Cli::try_parse_from(["feedo", "-S", "rust", "-N", "0"]).unwrap();
        assert!(cli.into_settings().is_err());
    }
}
