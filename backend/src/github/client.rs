//! HTTP calls to GitHub.

use super::{Endpoints, Error, RedirectKind, Result};
use reqwest::header;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// The REST API version we were written against.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// An access token from <https://github.com/login/oauth/access_token>
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Token {
    /// The bearer credential.
    pub access_token: String,
    /// Normally `"bearer"`. Not checked.
    pub token_type: String,
    /// The scopes actually granted, comma separated.
    pub scope: String,
}

/// A response from <https://github.com/login/oauth/access_token>
///
/// GitHub responds `200 OK` to failed exchanges too, so success is decided by
/// which fields are present.
#[derive(Debug, Deserialize)]
struct GitHubTokenResponse {
    /// The access token if the request was successful.
    access_token: Option<String>,
    /// The token type if the request was successful.
    token_type: Option<String>,
    /// The granted scopes if the request was successful.
    scope: Option<String>,
    /// The error code if the request failed.
    error: Option<String>,
    /// The error message if the request failed.
    error_description: Option<String>,
}

impl TryFrom<GitHubTokenResponse> for Token {
    type Error = Error;

    fn try_from(response: GitHubTokenResponse) -> Result<Self> {
        if let Some(code) = response.error {
            let description =
                response.error_description.unwrap_or_else(|| code.clone());
            return Err(Error::OAuth { code, description });
        }

        Ok(Self {
            access_token: response
                .access_token
                .ok_or(Error::MissingAccessToken)?,
            token_type: response.token_type.unwrap_or_default(),
            scope: response.scope.unwrap_or_default(),
        })
    }
}

/// Client for GitHub’s OAuth and REST endpoints.
///
/// Cheap to clone; clones share a connection pool.
#[derive(Clone, Debug)]
pub struct GitHubClient {
    /// Shared HTTP client.
    http_client: reqwest::Client,
    /// Where to send requests.
    endpoints: Endpoints,
}

impl GitHubClient {
    /// Create a new client.
    ///
    /// `timeout` bounds every request from start to end of body. `None` means
    /// requests may block forever.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(endpoints: Endpoints, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION"),
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self { http_client: builder.build()?, endpoints })
    }

    /// The endpoints this client talks to.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Exchange an authorization code for an access token.
    ///
    /// `url` should come from [`super::build_token_exchange_url()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] on transport failure, [`Error::Decode`] if
    /// the body isn’t JSON, [`Error::OAuth`] if GitHub rejected the code, and
    /// [`Error::MissingAccessToken`] if the response was empty.
    pub async fn exchange_code_for_token(&self, url: Url) -> Result<Token> {
        // The URL carries the client secret, so it must not end up in errors.
        let body = self
            .http_client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(reqwest::Error::without_url)?
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?;

        serde_json::from_slice::<GitHubTokenResponse>(&body)?.try_into()
    }

    /// Fetch the resource for `kind` and return the body unmodified.
    ///
    /// The body is checked to be JSON but is not re-serialized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] on transport failure, [`Error::Status`] if
    /// GitHub didn’t return success, and [`Error::Decode`] if the body isn’t
    /// JSON.
    pub async fn fetch_resource(
        &self,
        access_token: &str,
        kind: RedirectKind,
    ) -> Result<Vec<u8>> {
        let response = self
            .http_client
            .get(self.endpoints.resource(kind).clone())
            .bearer_auth(access_token)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice::<serde::de::IgnoredAny>(&body)?;
        Ok(body.to_vec())
    }
}
