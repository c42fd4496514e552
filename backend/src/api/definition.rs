//! API contract definitions.
//!
//! This module contains the trait definitions and type signatures that define
//! the API surface. These are independent of any particular implementation.

use crate::github::{self, AuthorizeUrls, RedirectKind, Token};
use dropshot::{Body, HttpError, HttpResponseOk, Path, Query, RequestContext};
use http::{Response, StatusCode, header};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Response from `/api/health`
#[derive(Debug, Serialize, JsonSchema)]
pub struct HealthResponse {
    /// Health status (always `"ok"`).
    ///
    /// This indicates that the API server is up and nothing more.
    pub status: String,
}

/// Response from `/api/version`
#[derive(Debug, Serialize, JsonSchema)]
pub struct VersionResponse {
    /// Version string from git describe.
    pub version: String,
}

/// Path parameters for `/oauth/redirect/{kind}`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RedirectPathParams {
    /// Which resource to fetch: `info`, `emails`, or `orgs`.
    pub kind: String,
}

/// Query parameters for `/oauth/redirect/{kind}`
#[derive(Debug, Deserialize, JsonSchema)]
pub struct RedirectQueryParams {
    /// The code from GitHub.
    ///
    /// A missing code is passed to GitHub as an empty string, which GitHub
    /// rejects.
    pub code: Option<String>,
}

/// Base trait defining the business logic for the API.
///
/// This trait contains the actual implementation methods that handle
/// the business logic for each endpoint. Implement this trait to provide
/// custom behavior (e.g., for testing with mocks).
pub trait ApiBase: Send + Sync {
    /// Check that the API server is up.
    ///
    /// If the API server is up, this always returns `{"status":"ok"}`. It
    /// intentionally does not check anything else.
    fn check_health(&self) -> impl Future<Output = String> + Send;

    /// Get the application version.
    fn get_version(&self) -> impl Future<Output = String> + Send;

    /// Build the authorize URLs shown on the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the redirect base URL is invalid.
    fn authorize_urls(&self) -> github::Result<AuthorizeUrls>;

    /// Render the home page.
    fn render_home(&self, urls: &AuthorizeUrls) -> String;

    /// Exchange a GitHub OAuth code for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or GitHub rejects the code.
    fn exchange_code(
        &self,
        code: &str,
        log: &slog::Logger,
    ) -> impl Future<Output = github::Result<Token>> + Send;

    /// Fetch the GitHub resource for `kind` and return its raw JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or GitHub doesn’t return JSON.
    fn fetch_resource(
        &self,
        access_token: &str,
        kind: RedirectKind,
        log: &slog::Logger,
    ) -> impl Future<Output = github::Result<Vec<u8>>> + Send;
}

/// API trait with endpoint definitions.
///
/// This trait defines the HTTP API surface using Dropshot’s endpoint
/// attributes. The default implementations delegate to the `ApiBase` trait,
/// allowing for multiple implementations (production, test, mock, etc.).
#[dropshot::api_description]
pub trait LoginApi {
    /// The context type must implement `ApiBase`.
    type Context: ApiBase;

    /// Handle `/`
    ///
    /// Shows links that start the OAuth flow for each redirect kind.
    #[endpoint {
        method = GET,
        path = "/",
    }]
    async fn home(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<Response<Body>, HttpError> {
        let context = rqctx.context();
        let urls = context.authorize_urls().map_err(|error| {
            slog::error!(rqctx.log, "Could not build authorize URLs: {error}");
            HttpError::for_internal_error(error.to_string())
        })?;

        respond(
            StatusCode::OK,
            "text/html; charset=utf-8",
            context.render_home(&urls),
        )
    }

    /// Handle `/api/health`
    #[endpoint {
        method = GET,
        path = "/api/health",
    }]
    async fn health_check(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<HealthResponse>, HttpError> {
        let status = rqctx.context().check_health().await;
        Ok(HttpResponseOk(HealthResponse { status }))
    }

    /// Handle `/api/version`
    #[endpoint {
        method = GET,
        path = "/api/version",
    }]
    async fn version(
        rqctx: RequestContext<Self::Context>,
    ) -> Result<HttpResponseOk<VersionResponse>, HttpError> {
        let version = rqctx.context().get_version().await;
        Ok(HttpResponseOk(VersionResponse { version }))
    }

    /// Handle `/oauth/redirect/{kind}`
    ///
    /// GitHub sends the user here after they authorize the app. The code is
    /// exchanged for a token, and the token is used to fetch the resource,
    /// which is returned as is.
    ///
    /// Failures are returned as plain text: `422` for an unknown kind, `500`
    /// for a failed exchange or fetch.
    #[endpoint {
        method = GET,
        path = "/oauth/redirect/{kind}",
    }]
    async fn oauth_redirect(
        rqctx: RequestContext<Self::Context>,
        path: Path<RedirectPathParams>,
        query: Query<RedirectQueryParams>,
    ) -> Result<Response<Body>, HttpError> {
        let context = rqctx.context();
        let log = &rqctx.log;

        let kind = match path.into_inner().kind.parse::<RedirectKind>() {
            Ok(kind) => kind,
            Err(error) => {
                return plain_text(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    error.to_string(),
                );
            }
        };

        let code = query.into_inner().code.unwrap_or_default();
        let token = match context.exchange_code(&code, log).await {
            Ok(token) => token,
            Err(error) => {
                slog::warn!(log, "Token exchange failed: {error}");
                return plain_text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("token exchange failed: {error}"),
                );
            }
        };

        match context.fetch_resource(&token.access_token, kind, log).await {
            Ok(body) => respond(StatusCode::OK, "application/json", body),
            Err(error) => {
                slog::warn!(log, "Fetching {kind} failed: {error}");
                plain_text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("fetching {kind} failed: {error}"),
                )
            }
        }
    }
}

/// Build a response with a body that doesn’t go through the JSON serializer.
///
/// # Errors
///
/// Only fails if the response can’t be built, which would be a bug.
fn respond<B: Into<Body>>(
    status: StatusCode,
    content_type: &'static str,
    body: B,
) -> Result<Response<Body>, HttpError> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(body.into())
        .map_err(|error| HttpError::for_internal_error(error.to_string()))
}

/// Build a plain text response, usually for an error.
///
/// # Errors
///
/// Only fails if the response can’t be built, which would be a bug.
fn plain_text(
    status: StatusCode,
    message: String,
) -> Result<Response<Body>, HttpError> {
    respond(status, "text/plain; charset=utf-8", message)
}
