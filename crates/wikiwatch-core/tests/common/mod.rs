// Fixture-backed `MediaWikiService` shared by the core integration tests.
//
// Routes each request to a JSON file under `tests/fixtures/` by inspecting
// its method, host and parameters, and records every request it sees.
// Individual routes can be overridden, failed, or delayed per test.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use wikiwatch_api::{Error, MediaWikiService, Method, ServiceRequest};

#[derive(Clone, Default)]
pub struct FixtureService {
    state: Arc<State>,
}

#[derive(Default)]
struct State {
    requests: Mutex<Vec<ServiceRequest>>,
    overrides: Mutex<HashMap<String, Value>>,
    failures: Mutex<HashMap<String, u16>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl FixtureService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` instead of the fixture file for `route`.
    pub fn respond(&self, route: &str, body: Value) -> &Self {
        self.state
            .overrides
            .lock()
            .unwrap()
            .insert(route.to_owned(), body);
        self
    }

    /// Answer `route` with an HTTP error instead of a body.
    pub fn fail(&self, route: &str, status: u16) -> &Self {
        self.state
            .failures
            .lock()
            .unwrap()
            .insert(route.to_owned(), status);
        self
    }

    /// Hold the response for `route` back by `delay`.
    pub fn delay(&self, route: &str, delay: Duration) -> &Self {
        self.state
            .delays
            .lock()
            .unwrap()
            .insert(route.to_owned(), delay);
        self
    }

    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Recorded requests carrying `action={action}`.
    pub fn requests_for(&self, action: &str) -> Vec<ServiceRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.parameter("action") == Some(action))
            .collect()
    }

    fn respond_to(&self, route: &str) -> Result<Value, Error> {
        if let Some(&status) = self.state.failures.lock().unwrap().get(route) {
            return Err(Error::Http {
                status,
                message: format!("fixture failure for {route}"),
            });
        }
        if let Some(body) = self.state.overrides.lock().unwrap().get(route) {
            return Ok(body.clone());
        }
        load_fixture(route)
    }
}

impl MediaWikiService for FixtureService {
    async fn perform(&self, request: &ServiceRequest) -> Result<Value, Error> {
        self.state.requests.lock().unwrap().push(request.clone());

        let Some(route) = route(request) else {
            return Err(Error::Http {
                status: 400,
                message: format!("no fixture route for {:?}", request.parameters),
            });
        };

        let delay = self.state.delays.lock().unwrap().get(&route).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.respond_to(&route)
    }
}

/// Fixture name for a request, mirroring how the API dispatches on
/// `action` and its sub-parameters.
pub fn route(request: &ServiceRequest) -> Option<String> {
    let p = |key: &str| request.parameter(key);

    let name = match (request.method, p("action")?) {
        (Method::Get, "query") if p("list") == Some("watchlist") => {
            format!("watchlist-get-list-{}", site(request)?)
        }
        (Method::Get, "query") if p("prop") == Some("info") => {
            if p("meta") == Some("userinfo") {
                "watchlist-get-watch-status-rollback-rights".into()
            } else {
                "watchlist-get-watch-status".into()
            }
        }
        (Method::Get, "query") if p("meta") == Some("allmessages") => {
            "watchlist-get-undo-summary".into()
        }
        (Method::Post, "watch") if p("unwatch") == Some("1") => {
            "watchlist-post-unwatch-article".into()
        }
        (Method::Post, "watch") => match p("expiry")? {
            "never" => "watchlist-post-watch-article-expiry-never".into(),
            _ => "watchlist-post-watch-article-expiry-date".into(),
        },
        (Method::Post, "rollback") => "watchlist-post-rollback-article".into(),
        (Method::Post, "edit") => "watchlist-post-undo-article".into(),
        _ => return None,
    };
    Some(name)
}

/// `en` for `en.wikipedia.org`, `commons`, or `wikidata`.
fn site(request: &ServiceRequest) -> Option<String> {
    let host = request.url.host_str()?;
    if host.contains("wikidata") {
        return Some("wikidata".into());
    }
    host.split('.').next().map(str::to_owned)
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{name}.json"))
}

pub fn load_fixture(name: &str) -> Result<Value, Error> {
    let path = fixture_path(name);
    let raw = std::fs::read_to_string(&path).map_err(|e| Error::Http {
        status: 404,
        message: format!("{}: {e}", path.display()),
    })?;
    Ok(serde_json::from_str(&raw).unwrap())
}
