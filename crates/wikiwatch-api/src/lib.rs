// wikiwatch-api: Async Rust client for the MediaWiki Action API

pub mod auth;
pub mod client;
pub mod error;
pub mod service;
pub mod transport;
pub mod types;

pub use client::MediaWikiClient;
pub use error::Error;
pub use service::{MediaWikiService, Method, ServiceRequest, TokenKind};
pub use transport::{TlsMode, TransportConfig};
