use std::fmt;

use chrono::{DateTime, Utc};

/// Run state machine. `Failed` is only reachable from `Loading`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Loading,
    Fetching,
    Normalizing,
    Filtering,
    Publishing,
    Done,
    Interrupted,
    Failed(String),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Done | RunState::Interrupted | RunState::Failed(_)
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => f.write_str("idle"),
            RunState::Loading => f.write_str("loading"),
            RunState::Fetching => f.write_str("fetching"),
            RunState::Normalizing => f.write_str("normalizing"),
            RunState::Filtering => f.write_str("filtering"),
            RunState::Publishing => f.write_str("publishing"),
            RunState::Done => f.write_str("done"),
            RunState::Interrupted => f.write_str("interrupted"),
            RunState::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Per-run tallies.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: RunState,
    pub sources_fetched: usize,
    pub sources_failed: usize,
    pub entries_considered: usize,
    pub entries_malformed: usize,
    pub entries_published: usize,
    pub entries_duplicate: usize,
    pub publish_rejected: usize,
    pub publish_failed: usize,
    pub fatal_errors: usize,
    /// Remaining publishes were abandoned because the channel session died.
    pub session_lost: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Default for RunOutcome {
    fn default() -> Self {
        Self::new()
    }
}

impl RunOutcome {
    pub fn new() -> Self {
        Self {
            state: RunState::Idle,
            sources_fetched: 0,
            sources_failed: 0,
            entries_considered: 0,
            entries_malformed: 0,
            entries_published: 0,
            entries_duplicate: 0,
            publish_rejected: 0,
            publish_failed: 0,
            fatal_errors: 0,
            session_lost: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn advance(&mut self, state: RunState) {
        tracing::debug!("Run state: {} -> {}", self.state, state);
        if state.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        self.state = state;
    }

    pub fn fail(mut self, reason: impl Into<String>) -> Self {
        self.fatal_errors += 1;
        self.advance(RunState::Failed(reason.into()));
        self
    }

    pub fn interrupt(mut self) -> Self {
        self.advance(RunState::Interrupted);
        self
    }

    pub fn non_fatal_errors(&self) -> usize {
        self.sources_failed + self.entries_malformed + self.publish_rejected + self.publish_failed
    }

    pub fn elapsed_secs(&self) -> f64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        end.signed_duration_since(self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self.state {
            RunState::Failed(_) => 1,
            RunState::Interrupted => 130,
            _ => 0,
        }
    }
}
