//! Production implementation of the API.
//!
//! This module contains the concrete implementation of the API traits,
//! including the GitHub OAuth integration.

use super::definition::{ApiBase, LoginApi};
use crate::config::{Config, OAuthConfig};
use crate::github::{
    self, AuthorizeUrls, GitHubClient, RedirectKind, Token,
    build_token_exchange_url,
};
use crate::views::Template;

/// State data for the API (GitHub credentials, HTTP client, and templates).
///
/// Everything here is read only once the server starts.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The GitHub OAuth app settings.
    pub oauth: OAuthConfig,
    /// Client for making requests to GitHub.
    pub github: GitHubClient,
    /// The compiled home page.
    pub home_template: Template,
}

impl AppState {
    /// Create state from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client can’t be created.
    pub fn new(config: Config, home_template: Template) -> github::Result<Self> {
        Ok(Self {
            oauth: config.oauth,
            github: GitHubClient::new(config.endpoints, config.timeout)?,
            home_template,
        })
    }
}

impl ApiBase for AppState {
    async fn check_health(&self) -> String {
        "ok".to_owned()
    }

    async fn get_version(&self) -> String {
        env!("GIT_VERSION").to_owned()
    }

    fn authorize_urls(&self) -> github::Result<AuthorizeUrls> {
        AuthorizeUrls::build(&self.oauth, self.github.endpoints())
    }

    fn render_home(&self, urls: &AuthorizeUrls) -> String {
        self.home_template.render(urls)
    }

    async fn exchange_code(
        &self,
        code: &str,
        log: &slog::Logger,
    ) -> github::Result<Token> {
        let url = build_token_exchange_url(
            &self.oauth,
            self.github.endpoints(),
            code,
        );
        let token = self.github.exchange_code_for_token(url).await?;
        let Token { token_type, scope, .. } = &token;
        slog::debug!(log, "Got {token_type} token with scope {scope:?}");
        Ok(token)
    }

    async fn fetch_resource(
        &self,
        access_token: &str,
        kind: RedirectKind,
        log: &slog::Logger,
    ) -> github::Result<Vec<u8>> {
        let body = self.github.fetch_resource(access_token, kind).await?;
        slog::debug!(log, "Fetched {kind}: {} bytes", body.len());
        Ok(body)
    }
}

/// Implementation type for the `LoginApi` trait.
///
/// This is an empty enum that serves as the implementation marker.
/// All the actual logic is in the default trait methods.
pub enum LoginApiImpl {}

impl LoginApi for LoginApiImpl {
    type Context = AppState;
}
