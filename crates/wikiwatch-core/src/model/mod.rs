// ── Domain model ──

pub mod project;
pub mod watch;
pub mod watchlist;

pub use project::{Language, Project};
pub use watch::{ExpiryType, UndoOrRollbackResult, WatchStatus};
pub use watchlist::{ProjectFailure, Watchlist, WatchlistItem};
