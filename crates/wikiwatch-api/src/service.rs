// Service client contract
//
// A `ServiceRequest` is a flat parameter map aimed at one project's API
// endpoint. `MediaWikiService` is the seam between the workflows in
// `wikiwatch-core` and whatever actually talks HTTP: the reqwest-backed
// `MediaWikiClient` in production, fixture-backed fakes in tests.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::Error;

/// HTTP verb for a service request. Reads are GET, mutations are POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Which capability-specific token a mutating request needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Generic edit token.
    Csrf,
    Watch,
    Rollback,
}

impl TokenKind {
    /// The `type=` literal for `action=query&meta=tokens`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csrf => "csrf",
            Self::Watch => "watch",
            Self::Rollback => "rollback",
        }
    }

    /// The key under `query.tokens` that carries this token.
    pub fn response_key(self) -> String {
        format!("{}token", self.as_str())
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request against a single project's API endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub url: Url,
    pub method: Method,
    /// Token the client must acquire and attach before dispatch.
    pub token: Option<TokenKind>,
    pub parameters: BTreeMap<String, String>,
}

impl ServiceRequest {
    /// A read-only GET request.
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: Method::Get,
            token: None,
            parameters: BTreeMap::new(),
        }
    }

    /// A mutating POST request that needs a token of the given kind.
    pub fn post(url: Url, token: TokenKind) -> Self {
        Self {
            url,
            method: Method::Post,
            token: Some(token),
            parameters: BTreeMap::new(),
        }
    }

    /// Set a parameter, replacing any previous value.
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.parameters.insert(key.to_owned(), value.into());
        self
    }

    /// Set a parameter only when a value is present.
    pub fn param_opt(self, key: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Look up a parameter value.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

/// Performs authenticated requests against MediaWiki API endpoints.
///
/// Implementors acquire and attach `request.token` before dispatching
/// and fail with [`Error::TokenUnavailable`] when they cannot.
pub trait MediaWikiService: Send + Sync {
    /// Dispatch a request and return the loosely-typed JSON body.
    fn perform(&self, request: &ServiceRequest) -> impl Future<Output = Result<Value, Error>> + Send;

    /// Dispatch a request and decode the body into `T`.
    ///
    /// Decoding happens once, here, so callers only ever see typed
    /// per-operation schemas.
    fn perform_typed<T>(
        &self,
        request: &ServiceRequest,
    ) -> impl Future<Output = Result<T, Error>> + Send
    where
        T: DeserializeOwned + Send,
    {
        async move {
            let value = self.perform(request).await?;
            T::deserialize(&value).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: value.to_string(),
            })
        }
    }
}
