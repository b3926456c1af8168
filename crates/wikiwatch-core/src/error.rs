// ── Core error types ──
//
// Domain-level failures from wikiwatch-core. Transport problems from
// wikiwatch-api are wrapped whole in `Service` so the original cause
// stays reachable through `source()`.

use thiserror::Error;

use wikiwatch_api::types::ApiError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Setup errors ─────────────────────────────────────────────────
    #[error("No MediaWiki service is attached -- call connect() first")]
    ServiceUnavailable,

    #[error("No languages configured for the watchlist")]
    LanguagesUnavailable,

    #[error("Cannot determine API endpoint for {project}: {reason}")]
    EndpointResolution { project: String, reason: String },

    // ── Response errors ──────────────────────────────────────────────
    #[error("{project} reported {}", format_api_errors(.errors))]
    RemoteReported {
        project: String,
        errors: Vec<ApiError>,
    },

    #[error("Unexpected response to {operation}")]
    UnexpectedResponse { operation: &'static str },

    // ── Transport errors (wrapped, not flattened) ────────────────────
    #[error("Service error: {0}")]
    Service(#[from] wikiwatch_api::Error),
}

impl CoreError {
    /// Build a `RemoteReported` error if the payload carried any errors.
    pub(crate) fn from_api_errors(project: &impl ToString, errors: Vec<ApiError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self::RemoteReported {
                project: project.to_string(),
                errors,
            })
        }
    }

    /// The first server-side error code, if this is a remote error.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::RemoteReported { errors, .. } => errors.first().map(|e| e.code.as_str()),
            _ => None,
        }
    }
}

fn format_api_errors(errors: &[ApiError]) -> String {
    match errors {
        [] => "an unspecified error".into(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (+{} more)", rest.len()),
    }
}
