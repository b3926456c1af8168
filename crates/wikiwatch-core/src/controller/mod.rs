// ── Controller abstraction ──
//
// Entry point for consumers. Owns the runtime config, the endpoint
// resolver, and the attached MediaWiki service. Watchlist aggregation
// lives in `watchlist.rs`, page mutations in `mutations.rs`, both as
// inherent methods on the same type.

mod mutations;
mod watchlist;

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::{debug, info};
use url::Url;

use wikiwatch_api::{MediaWikiClient, MediaWikiService, TlsMode, TransportConfig};

use crate::config::WatchlistConfig;
use crate::endpoint::{EndpointResolver, WikimediaEndpoints};
use crate::error::CoreError;
use crate::model::Project;

pub use watchlist::watchlist_projects;

/// Watchlist and page-mutation operations across a user's projects.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Generic over the service
/// so tests can attach a fixture-backed implementation; production code
/// uses the default [`MediaWikiClient`] and [`connect()`](Self::connect).
pub struct WatchlistController<S = MediaWikiClient> {
    inner: Arc<ControllerInner<S>>,
}

struct ControllerInner<S> {
    config: WatchlistConfig,
    endpoints: Box<dyn EndpointResolver>,
    service: ArcSwapOption<S>,
}

impl<S> Clone for WatchlistController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MediaWikiService> WatchlistController<S> {
    /// Create a controller against the production Wikimedia hosts.
    /// No service is attached yet.
    pub fn new(config: WatchlistConfig) -> Self {
        Self::with_endpoints(config, WikimediaEndpoints)
    }

    /// Create a controller with a custom endpoint resolver.
    pub fn with_endpoints(
        config: WatchlistConfig,
        endpoints: impl EndpointResolver + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                config,
                endpoints: Box::new(endpoints),
                service: ArcSwapOption::empty(),
            }),
        }
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &WatchlistConfig {
        &self.inner.config
    }

    /// Attach (or replace) the service every operation goes through.
    pub fn attach_service(&self, service: S) {
        self.inner.service.store(Some(Arc::new(service)));
        debug!("service attached");
    }

    /// Drop the attached service. Later operations fail with
    /// [`CoreError::ServiceUnavailable`] until one is attached again.
    pub fn disconnect(&self) {
        self.inner.service.store(None);
        debug!("service detached");
    }

    pub fn is_connected(&self) -> bool {
        self.inner.service.load().is_some()
    }

    // ── Helpers ──────────────────────────────────────────────────

    pub(crate) fn service(&self) -> Result<Arc<S>, CoreError> {
        self.inner
            .service
            .load_full()
            .ok_or(CoreError::ServiceUnavailable)
    }

    pub(crate) fn endpoint(&self, project: &Project) -> Result<Url, CoreError> {
        self.inner.endpoints.resolve(project)
    }
}

impl WatchlistController<MediaWikiClient> {
    /// Build the HTTP client from config and attach it.
    ///
    /// With credentials configured, logs in to every project the
    /// watchlist touches (bot-password sessions are per wiki). Any
    /// login failure aborts the connect and leaves no service attached.
    pub async fn connect(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;
        let tls = config
            .ca_cert
            .clone()
            .map_or(TlsMode::System, TlsMode::CustomCa);
        let transport = TransportConfig {
            tls,
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
            ..TransportConfig::default()
        }
        .with_cookie_jar();

        let client = MediaWikiClient::new(&transport)?;

        if let Some(credentials) = &config.credentials {
            for project in watchlist_projects(&config.languages) {
                let url = self.endpoint(&project)?;
                client
                    .login(&url, &credentials.username, &credentials.password)
                    .await?;
                debug!(%project, "logged in");
            }
        } else {
            debug!("no credentials configured -- staying anonymous");
        }

        self.attach_service(client);
        info!(
            languages = config.languages.len(),
            authenticated = config.credentials.is_some(),
            "connected"
        );
        Ok(())
    }
}
