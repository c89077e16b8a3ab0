pub mod context;
pub mod error;
pub mod shutdown;

pub use context::RunContext;
pub use error::{FeedoError, Result};
pub use shutdown::Shutdown;
