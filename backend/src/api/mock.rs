//! Mock implementation of the API for testing.

use super::definition::{ApiBase, LoginApi};
use crate::config::OAuthConfig;
use crate::github::{self, AuthorizeUrls, Endpoints, RedirectKind, Token};

/// Mock state for testing that returns predefined responses.
#[derive(Clone, Debug)]
pub struct MockAppState {
    /// The health status to return.
    pub health_status: String,
    /// Settings used to build authorize URLs.
    pub oauth: OAuthConfig,
    /// The access token to return from OAuth.
    pub mock_access_token: Option<String>,
    /// OAuth error code to return from the exchange (if Some).
    pub mock_oauth_error: Option<String>,
    /// Status to fail resource fetches with (if Some).
    pub mock_fetch_status: Option<reqwest::StatusCode>,
}

impl MockAppState {
    /// Create a new mock state with successful defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            health_status: "ok".to_owned(),
            oauth: OAuthConfig {
                client_id: "mock_client_id".to_owned(),
                client_secret: "mock_client_secret".to_owned(),
                redirect_base_url: "http://127.0.0.1:3001/oauth/redirect"
                    .to_owned(),
            },
            mock_access_token: Some("mock_token_12345".to_owned()),
            mock_oauth_error: None,
            mock_fetch_status: None,
        }
    }

    /// Create a mock state that simulates OAuth failure.
    #[must_use]
    pub fn with_oauth_error(error: String) -> Self {
        Self {
            mock_access_token: None,
            mock_oauth_error: Some(error),
            ..Self::new()
        }
    }

    /// Create a mock state where GitHub rejects every resource fetch.
    #[must_use]
    pub fn with_fetch_status(status: reqwest::StatusCode) -> Self {
        Self { mock_fetch_status: Some(status), ..Self::new() }
    }
}

impl Default for MockAppState {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiBase for MockAppState {
    async fn check_health(&self) -> String {
        self.health_status.clone()
    }

    async fn get_version(&self) -> String {
        env!("GIT_VERSION").to_owned()
    }

    fn authorize_urls(&self) -> github::Result<AuthorizeUrls> {
        AuthorizeUrls::build(&self.oauth, &Endpoints::default())
    }

    fn render_home(&self, urls: &AuthorizeUrls) -> String {
        urls.iter()
            .map(|(kind, url)| format!("<a href=\"{url}\">{kind}</a>\n"))
            .collect()
    }

    async fn exchange_code(
        &self,
        _code: &str,
        _log: &slog::Logger,
    ) -> github::Result<Token> {
        if let Some(error) = &self.mock_oauth_error {
            Err(github::Error::OAuth {
                code: error.clone(),
                description: "Mock OAuth failure".to_owned(),
            })
        } else {
            let access_token = self
                .mock_access_token
                .clone()
                .ok_or(github::Error::MissingAccessToken)?;

            Ok(Token {
                access_token,
                token_type: "bearer".to_owned(),
                scope: String::new(),
            })
        }
    }

    async fn fetch_resource(
        &self,
        access_token: &str,
        kind: RedirectKind,
        _log: &slog::Logger,
    ) -> github::Result<Vec<u8>> {
        if let Some(status) = self.mock_fetch_status {
            return Err(github::Error::Status(status));
        }

        Ok(serde_json::to_vec(&serde_json::json!({
            "kind": kind.path_segment(),
            "access_token": access_token,
        }))?)
    }
}

/// Mock implementation type for the `LoginApi` trait.
pub enum MockApiImpl {}

impl LoginApi for MockApiImpl {
    type Context = MockAppState;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::discard_log;
    use assert2::{assert, let_assert};

    #[tokio::test]
    async fn test_mock_health() {
        let mock_state = MockAppState::new();
        let result = mock_state.check_health().await;
        assert!(result == "ok");
    }

    #[tokio::test]
    async fn test_mock_oauth_success() {
        let mock_state = MockAppState::new();
        let result = mock_state.exchange_code("test_code", &discard_log()).await;
        let_assert!(Ok(token) = result);
        assert!(token.access_token == "mock_token_12345");
    }

    #[tokio::test]
    async fn test_mock_oauth_failure() {
        let mock_state =
            MockAppState::with_oauth_error("bad_verification_code".to_owned());
        let result = mock_state.exchange_code("test_code", &discard_log()).await;
        let_assert!(Err(github::Error::OAuth { code, .. }) = result);
        assert!(code == "bad_verification_code");
    }

    #[tokio::test]
    async fn test_mock_fetch_echoes_token() {
        let mock_state = MockAppState::new();
        let body = mock_state
            .fetch_resource("abc", RedirectKind::Orgs, &discard_log())
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(
            value == serde_json::json!({"kind": "orgs", "access_token": "abc"})
        );
    }

    #[test]
    fn test_mock_home_links() {
        let mock_state = MockAppState::new();
        let urls = mock_state.authorize_urls().unwrap();
        let html = mock_state.render_home(&urls);
        assert!(html.lines().count() == 3);
        assert!(html.contains(">emails</a>"));
    }
}
