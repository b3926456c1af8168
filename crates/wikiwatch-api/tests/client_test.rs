#![allow(clippy::unwrap_used)]
// Integration tests for `MediaWikiClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wikiwatch_api::types::WatchlistResponse;
use wikiwatch_api::{Error, MediaWikiClient, MediaWikiService, ServiceRequest, TokenKind};

// ── Helpers ─────────────────────────────────────────────────────────

const API_PATH: &str = "/w/api.php";

async fn setup() -> (MockServer, MediaWikiClient, Url) {
    let server = MockServer::start().await;
    let url = Url::parse(&format!("{}{API_PATH}", server.uri())).unwrap();
    let client = MediaWikiClient::with_client(reqwest::Client::new());
    (server, client, url)
}

async fn mount_token(server: &MockServer, kind: &str, value: &str) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("meta", "tokens"))
        .and(query_param("type", kind))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": { "tokens": { (format!("{kind}token")): value } }
        })))
        .mount(server)
        .await;
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_carries_envelope_parameters() {
    let (server, client, url) = setup().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("action", "query"))
        .and(query_param("list", "watchlist"))
        .and(query_param("format", "json"))
        .and(query_param("formatversion", "2"))
        .and(query_param("errorformat", "html"))
        .and(query_param("errorsuselocal", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "query": { "watchlist": [{
                "title": "Talk:Cat",
                "revid": 1_157_699_533_u64,
                "old_revid": 1_157_699_360_u64,
                "user": "CatLover 1137",
                "anon": false,
                "bot": false,
                "timestamp": "2023-05-30T11:37:31Z",
                "newlen": 4021,
                "oldlen": 3990
            }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ServiceRequest::get(url)
        .param("action", "query")
        .param("list", "watchlist");
    let resp: WatchlistResponse = client.perform_typed(&request).await.unwrap();

    let entries = resp.query.unwrap().watchlist;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title.as_deref(), Some("Talk:Cat"));
    assert_eq!(entries[0].revid, 1_157_699_533);
    assert_eq!(entries[0].newlen, 4021);
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, client, url) = setup().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let result = client
        .perform(&ServiceRequest::get(url).param("action", "query"))
        .await;

    match result {
        Err(Error::Http { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream unavailable");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_body_is_deserialization_error() {
    let (server, client, url) = setup().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client
        .perform(&ServiceRequest::get(url).param("action", "query"))
        .await;

    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body.contains("maintenance")),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_typed_decode_mismatch() {
    let (server, client, url) = setup().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "query": { "watchlist": 42 } })),
        )
        .mount(&server)
        .await;

    let request = ServiceRequest::get(url).param("action", "query");
    let result = client.perform_typed::<WatchlistResponse>(&request).await;

    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_post_attaches_fetched_token() {
    let (server, client, url) = setup().await;
    mount_token(&server, "watch", "deadbeef+\\").await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_string_contains("action=watch"))
        .and(body_string_contains("titles=Cat"))
        .and(body_string_contains("token=deadbeef%2B%5C"))
        .and(body_string_contains("formatversion=2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "batchcomplete": true,
            "watch": [{ "title": "Cat", "watched": true }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = ServiceRequest::post(url, TokenKind::Watch)
        .param("action", "watch")
        .param("titles", "Cat");
    let body = client.perform(&request).await.unwrap();

    assert_eq!(body["watch"][0]["watched"], json!(true));
}

#[tokio::test]
async fn test_anonymous_watch_token_is_unavailable() {
    let (server, client, url) = setup().await;
    mount_token(&server, "watch", "+\\").await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let request = ServiceRequest::post(url, TokenKind::Watch).param("action", "watch");
    let result = client.perform(&request).await;

    assert!(
        matches!(
            result,
            Err(Error::TokenUnavailable {
                kind: TokenKind::Watch
            })
        ),
        "expected TokenUnavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn test_anonymous_csrf_token_is_accepted() {
    let (server, client, url) = setup().await;
    mount_token(&server, "csrf", "+\\").await;

    let token = client.fetch_token(&url, TokenKind::Csrf).await.unwrap();
    assert_eq!(token, "+\\");
}

#[tokio::test]
async fn test_missing_token_is_unavailable() {
    let (server, client, url) = setup().await;

    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("meta", "tokens"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "batchcomplete": true })))
        .mount(&server)
        .await;

    let result = client.fetch_token(&url, TokenKind::Rollback).await;
    assert!(matches!(
        result,
        Err(Error::TokenUnavailable {
            kind: TokenKind::Rollback
        })
    ));
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client, url) = setup().await;
    mount_token(&server, "login", "logintok+\\").await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_string_contains("action=login"))
        .and(body_string_contains("lgname=CatLover%401137bot"))
        .and(body_string_contains("lgtoken=logintok%2B%5C"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": { "result": "Success", "lguserid": 42, "lgusername": "CatLover" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "bot-password".to_string().into();
    client.login(&url, "CatLover@1137bot", &secret).await.unwrap();
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client, url) = setup().await;
    mount_token(&server, "login", "logintok+\\").await;

    Mock::given(method("POST"))
        .and(path(API_PATH))
        .and(body_string_contains("action=login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": { "result": "Failed", "reason": "Incorrect username or password entered." }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login(&url, "CatLover@1137bot", &secret).await;

    match result {
        Err(Error::Authentication { message }) => {
            assert_eq!(message, "Incorrect username or password entered.");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}
