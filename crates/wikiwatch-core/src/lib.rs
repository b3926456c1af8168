// wikiwatch-core: Cross-wiki watchlist aggregation and page mutations on top of wikiwatch-api.

pub mod config;
pub mod controller;
pub mod convert;
pub mod endpoint;
pub mod error;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Credentials, WatchlistConfig};
pub use controller::{WatchlistController, watchlist_projects};
pub use endpoint::{EndpointResolver, WikimediaEndpoints};
pub use error::CoreError;

pub use model::{
    ExpiryType, Language, Project, ProjectFailure, UndoOrRollbackResult, WatchStatus, Watchlist,
    WatchlistItem,
};
