//! Tests that run the API over HTTP.

use super::mock::{MockApiImpl, MockAppState};
use super::{AppState, LoginApiImpl, login_api_mod};
use crate::config::{Config, OAuthConfig};
use crate::github::Endpoints;
use crate::test::TestServer;
use crate::views::Template;
use assert2::assert;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use wiremock::matchers::{header, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start the production API against a mock GitHub.
fn start_real(github: &MockServer) -> TestServer<AppState> {
    let config = Config {
        oauth: OAuthConfig {
            client_id: "id".to_owned(),
            client_secret: "secret".to_owned(),
            redirect_base_url: "http://localhost:8080/oauth/redirect"
                .to_owned(),
        },
        endpoints: Endpoints::with_base(&github.uri()).unwrap(),
        timeout: Some(Duration::from_secs(5)),
    };
    let state = AppState::new(config, Template::home().unwrap()).unwrap();
    let api = login_api_mod::api_description::<LoginApiImpl>().unwrap();
    TestServer::start(api, state)
}

/// Start the production API against a GitHub that refuses connections.
fn start_unreachable(client_secret: &str) -> TestServer<AppState> {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = Config {
        oauth: OAuthConfig {
            client_id: "id".to_owned(),
            client_secret: client_secret.to_owned(),
            redirect_base_url: "http://localhost:8080/oauth/redirect"
                .to_owned(),
        },
        endpoints: Endpoints::with_base(&format!("http://127.0.0.1:{port}"))
            .unwrap(),
        timeout: Some(Duration::from_secs(5)),
    };
    let state = AppState::new(config, Template::home().unwrap()).unwrap();
    let api = login_api_mod::api_description::<LoginApiImpl>().unwrap();
    TestServer::start(api, state)
}

/// Start the mock API.
fn start_mock(state: MockAppState) -> TestServer<MockAppState> {
    let api = login_api_mod::api_description::<MockApiImpl>().unwrap();
    TestServer::start(api, state)
}

/// Make GitHub accept `code` and hand out token `T`.
async fn mount_token(github: &MockServer, code: &str) {
    Mock::given(path("/login/oauth/access_token"))
        .and(query_param("code", code))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"access_token":"T","token_type":"bearer","scope":"user:email"}"#,
            "application/json",
        ))
        .mount(github)
        .await;
}

/// Get the `Content-Type` of a response.
fn content_type(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn health() {
    let server = start_mock(MockAppState::new());
    let response = server.get("/api/health").await;
    assert!(response.status() == StatusCode::OK);
    let text = response.text().await.unwrap();
    assert!(text == r#"{"status":"ok"}"#);
    server.close().await;
}

#[tokio::test]
async fn home_page() {
    let github = MockServer::start().await;
    let server = start_real(&github);

    let response = server.get("/").await;
    assert!(response.status() == StatusCode::OK);
    assert!(content_type(&response).starts_with("text/html"));

    let html = response.text().await.unwrap();
    let authorize =
        format!("{}/login/oauth/authorize?client_id=id", github.uri());
    assert!(html.matches(&authorize).count() == 3);
    let redirect = "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Foauth%2Fredirect";
    assert!(html.contains(&format!("{redirect}%2Finfo\"")));
    assert!(html.contains(&format!("{redirect}%2Femails&amp;scope=user%3Aemail\"")));
    assert!(html.contains(&format!("{redirect}%2Forgs&amp;scope=read%3Aorg\"")));

    server.close().await;
}

#[tokio::test]
async fn home_page_is_stable() {
    let github = MockServer::start().await;
    let server = start_real(&github);

    let first = server.get("/").await.text().await.unwrap();
    let second = server.get("/").await.text().await.unwrap();
    assert!(first == second);

    server.close().await;
}

#[tokio::test]
async fn redirect_proxies_body() {
    let body = r#"{"login":"octocat","id":1,  "name":null}"#;

    let github = MockServer::start().await;
    mount_token(&github, "good").await;
    Mock::given(path("/user"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            body,
            "application/json; charset=utf-8",
        ))
        .expect(1)
        .mount(&github)
        .await;

    let server = start_real(&github);
    let response = server.get("/oauth/redirect/info?code=good").await;
    assert!(response.status() == StatusCode::OK);
    assert!(content_type(&response) == "application/json");
    let text = response.text().await.unwrap();
    assert!(text == body);

    server.close().await;
}

#[tokio::test]
async fn redirect_emails_and_orgs() {
    let github = MockServer::start().await;
    mount_token(&github, "good").await;
    for (resource, body) in [
        ("/user/emails", r#"[{"email":"octocat@github.com"}]"#),
        ("/user/orgs", r#"[{"login":"github"}]"#),
    ] {
        Mock::given(path(resource))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(body, "application/json"),
            )
            .mount(&github)
            .await;
    }

    let server = start_real(&github);
    let emails = server.get("/oauth/redirect/emails?code=good").await;
    assert!(emails.status() == StatusCode::OK);
    let text = emails.text().await.unwrap();
    assert!(text.contains("octocat@github.com"));

    let orgs = server.get("/oauth/redirect/orgs?code=good").await;
    assert!(orgs.status() == StatusCode::OK);
    let text = orgs.text().await.unwrap();
    assert!(text == r#"[{"login":"github"}]"#);

    server.close().await;
}

#[tokio::test]
async fn redirect_without_code() {
    let github = MockServer::start().await;
    mount_token(&github, "good").await;
    Mock::given(path("/login/oauth/access_token"))
        .and(query_param("code", ""))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"error":"bad_verification_code","error_description":"The code passed is incorrect or expired."}"#,
            "application/json",
        ))
        .mount(&github)
        .await;

    let server = start_real(&github);
    let response = server.get("/oauth/redirect/info").await;
    assert!(response.status() == StatusCode::INTERNAL_SERVER_ERROR);
    assert!(content_type(&response).starts_with("text/plain"));
    let text = response.text().await.unwrap();
    assert!(
        text
            == "token exchange failed: bad_verification_code: \
                The code passed is incorrect or expired."
    );

    // Still serving.
    let health = server.get("/api/health").await;
    assert!(health.status() == StatusCode::OK);
    server.close().await;
}

#[tokio::test]
async fn redirect_token_endpoint_missing() {
    let github = MockServer::start().await;
    let server = start_real(&github);
    // Nothing mounted, so the token endpoint returns 404 with an empty body.
    let response = server.get("/oauth/redirect/orgs?code=x").await;
    assert!(response.status() == StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text().await.unwrap();
    assert!(
        text.starts_with("token exchange failed: could not decode response")
    );
    server.close().await;
}

#[tokio::test]
async fn redirect_unreachable_hides_secret() {
    let server = start_unreachable("hunter2");
    let response = server.get("/oauth/redirect/info?code=abc").await;
    assert!(response.status() == StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text().await.unwrap();
    assert!(text.starts_with("token exchange failed: "));
    assert!(!text.contains("hunter2"));
    assert!(!text.contains("client_secret"));
    server.close().await;
}

#[tokio::test]
async fn redirect_fetch_fails() {
    let github = MockServer::start().await;
    mount_token(&github, "good").await;
    Mock::given(path("/user/emails"))
        .respond_with(ResponseTemplate::new(403).set_body_raw(
            r#"{"message":"Resource not accessible by integration"}"#,
            "application/json",
        ))
        .mount(&github)
        .await;

    let server = start_real(&github);
    let response = server.get("/oauth/redirect/emails?code=good").await;
    assert!(response.status() == StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text().await.unwrap();
    assert!(
        text
            == "fetching emails failed: GitHub responded with 403 Forbidden"
    );
    server.close().await;
}

#[tokio::test]
async fn redirect_unknown_kind() {
    let server = start_mock(MockAppState::new());
    let response = server.get("/oauth/redirect/repos?code=x").await;
    assert!(response.status() == StatusCode::UNPROCESSABLE_ENTITY);
    let text = response.text().await.unwrap();
    assert!(text == "unsupported redirect kind: repos");
    server.close().await;
}

#[tokio::test]
async fn redirect_mock_oauth_error() {
    let server = start_mock(MockAppState::with_oauth_error(
        "incorrect_client_credentials".to_owned(),
    ));
    let response = server.get("/oauth/redirect/info?code=x").await;
    assert!(response.status() == StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text().await.unwrap();
    assert!(
        text
            == "token exchange failed: incorrect_client_credentials: \
                Mock OAuth failure"
    );
    server.close().await;
}

#[tokio::test]
async fn redirect_mock_fetch_status() {
    let server =
        start_mock(MockAppState::with_fetch_status(StatusCode::UNAUTHORIZED));
    let response = server.get("/oauth/redirect/orgs?code=x").await;
    assert!(response.status() == StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text().await.unwrap();
    assert!(
        text
            == "fetching orgs failed: GitHub responded with 401 Unauthorized"
    );
    server.close().await;
}

#[tokio::test]
async fn unknown_path() {
    let server = start_mock(MockAppState::new());
    let response = server.get("/oauth/callback").await;
    assert!(response.status() == StatusCode::NOT_FOUND);
    server.close().await;
}
