use thiserror::Error;

use crate::service::TokenKind;

/// Top-level error type for the `wikiwatch-api` crate.
///
/// Covers transport, token acquisition, login, and decoding failures.
/// Server-side `errors` arrays inside a successful HTTP 200 payload are
/// *not* represented here -- they travel inside the typed response and
/// `wikiwatch-core` decides what they mean for each operation.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Bot-password login was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The wiki did not hand out a usable token of the requested kind.
    #[error("No {kind} token available (are you logged in?)")]
    TokenUnavailable { kind: TokenKind },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status from the API endpoint.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error a caller might retry.
    ///
    /// The library itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the failure stems from missing or rejected credentials.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::TokenUnavailable { .. }
        )
    }
}
