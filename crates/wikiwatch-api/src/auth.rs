// MediaWiki authentication
//
// Token acquisition for mutating requests and bot-password login.
// The login call sets session cookies in the client's jar; later token
// fetches against the same wiki then return real (non-anonymous) tokens.

use std::collections::BTreeMap;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, trace};
use url::Url;

use crate::client::{MediaWikiClient, decode};
use crate::error::Error;
use crate::service::{Method, TokenKind};
use crate::types::{LoginResponse, TokensResponse};

/// Token value MediaWiki hands to anonymous sessions.
const ANONYMOUS_TOKEN: &str = "+\\";

impl MediaWikiClient {
    /// Fetch a fresh token of the given kind from the endpoint at `url`.
    ///
    /// Watch and rollback tokens are meaningless for anonymous sessions,
    /// so the anonymous placeholder is treated as unavailable for those.
    pub async fn fetch_token(&self, url: &Url, kind: TokenKind) -> Result<String, Error> {
        let token = self
            .query_token(url, kind.as_str(), &kind.response_key())
            .await?
            .filter(|t| kind == TokenKind::Csrf || t != ANONYMOUS_TOKEN);

        token.ok_or(Error::TokenUnavailable { kind })
    }

    /// Log in with a bot password (`User@BotName` + generated password).
    ///
    /// On success the session cookies stay in the client's cookie jar
    /// and authenticate every later request to that wiki.
    pub async fn login(
        &self,
        url: &Url,
        username: &str,
        password: &SecretString,
    ) -> Result<(), Error> {
        debug!(%username, "logging in at {url}");

        let login_token = self
            .query_token(url, "login", "logintoken")
            .await?
            .ok_or_else(|| Error::Authentication {
                message: "wiki did not issue a login token".into(),
            })?;

        let mut params = BTreeMap::new();
        params.insert("action".to_owned(), "login".to_owned());
        params.insert("lgname".to_owned(), username.to_owned());
        params.insert(
            "lgpassword".to_owned(),
            password.expose_secret().to_owned(),
        );
        params.insert("lgtoken".to_owned(), login_token);

        let value = self.dispatch(Method::Post, url.clone(), params).await?;
        let resp: LoginResponse = decode(&value)?;

        if let Some(err) = resp.errors.first() {
            return Err(Error::Authentication {
                message: err.to_string(),
            });
        }

        match resp.login {
            Some(login) if login.result == "Success" => {
                debug!(user = login.lgusername.as_deref(), "login successful");
                Ok(())
            }
            Some(login) => Err(Error::Authentication {
                message: login.reason.unwrap_or(login.result),
            }),
            None => Err(Error::Authentication {
                message: "login response carried no result".into(),
            }),
        }
    }

    /// `action=query&meta=tokens&type={token_type}`, returning the value
    /// under `query.tokens.{key}` if present and non-empty.
    async fn query_token(
        &self,
        url: &Url,
        token_type: &str,
        key: &str,
    ) -> Result<Option<String>, Error> {
        trace!(token_type, "fetching token");

        let mut params = BTreeMap::new();
        params.insert("action".to_owned(), "query".to_owned());
        params.insert("meta".to_owned(), "tokens".to_owned());
        params.insert("type".to_owned(), token_type.to_owned());

        let value = self.dispatch(Method::Get, url.clone(), params).await?;
        let resp: TokensResponse = decode(&value)?;

        Ok(resp
            .query
            .and_then(|mut q| q.tokens.remove(key))
            .filter(|t| !t.is_empty()))
    }
}
