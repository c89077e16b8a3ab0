pub mod entry;
pub mod outcome;
pub mod source;

pub use entry::{Entry, ParsedFeed, RawEntry};
pub use outcome::{RunOutcome, RunState};
pub use source::{FeedSource, SourceRegistry};
