// MediaWiki Action API HTTP client
//
// Wraps `reqwest::Client` with the request envelope every call shares
// (`format=json`, `formatversion=2`, html error format), token
// acquisition for mutating requests, and body decoding. Login and token
// helpers live in `auth.rs` as inherent methods on the same type.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::service::{MediaWikiService, Method, ServiceRequest};
use crate::transport::TransportConfig;

/// Parameters attached to every request unless the caller set them.
const ENVELOPE: [(&str, &str); 4] = [
    ("format", "json"),
    ("formatversion", "2"),
    ("errorformat", "html"),
    ("errorsuselocal", "1"),
];

/// Longest body excerpt carried inside an error message.
const BODY_PREVIEW_LEN: usize = 200;

/// Raw HTTP client for MediaWiki API endpoints.
///
/// Not bound to a single wiki: each [`ServiceRequest`] names its own
/// endpoint URL, so one client (and one cookie jar) serves every project.
pub struct MediaWikiClient {
    http: reqwest::Client,
}

impl MediaWikiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// A cookie jar is added when the config lacks one; login sessions
    /// and some token flows depend on cookies.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send one request with the shared envelope and return the JSON body.
    pub(crate) async fn dispatch(
        &self,
        method: Method,
        url: Url,
        mut params: BTreeMap<String, String>,
    ) -> Result<Value, Error> {
        for (key, value) in ENVELOPE {
            params
                .entry(key.to_owned())
                .or_insert_with(|| value.to_owned());
        }

        let builder = match method {
            Method::Get => {
                debug!(action = params.get("action").map(String::as_str), "GET {url}");
                self.http.get(url).query(&params)
            }
            Method::Post => {
                debug!(action = params.get("action").map(String::as_str), "POST {url}");
                self.http.post(url).form(&params)
            }
        };

        let resp = builder.send().await.map_err(Error::Transport)?;
        parse_body(resp).await
    }
}

impl MediaWikiService for MediaWikiClient {
    async fn perform(&self, request: &ServiceRequest) -> Result<Value, Error> {
        let mut params = request.parameters.clone();

        if let Some(kind) = request.token {
            let token = self.fetch_token(&request.url, kind).await?;
            trace!(%kind, "attaching token");
            params.insert("token".into(), token);
        }

        self.dispatch(request.method, request.url.clone(), params)
            .await
    }
}

/// Check the status line and decode the body as JSON.
async fn parse_body(resp: reqwest::Response) -> Result<Value, Error> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            message: preview(&body).to_owned(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

/// Decode an already-parsed body into a typed response.
pub(crate) fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, Error> {
    T::deserialize(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: value.to_string(),
    })
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(BODY_PREVIEW_LEN);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        let cut = preview(&body);
        assert!(cut.len() <= BODY_PREVIEW_LEN);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[test]
    fn short_bodies_are_not_truncated() {
        assert_eq!(preview("upstream timeout"), "upstream timeout");
    }
}
