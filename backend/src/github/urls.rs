//! Build GitHub OAuth URLs.
//!
//! The authorize URLs carry no anti-forgery `state` parameter, so the callback
//! cannot tell whether the flow was started by this server. Don’t use this for
//! anything where login CSRF matters.

use super::{Error, Result};
use crate::config::OAuthConfig;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// The public GitHub web host.
pub const GITHUB_URL: &str = "https://github.com/";

/// The public GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com/";

/// Which GitHub resource a callback request targets.
///
/// This also determines the callback path segment and the scopes requested
/// when authorizing.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RedirectKind {
    /// The user profile (`/user`).
    Info,
    /// The user’s email addresses (`/user/emails`).
    Emails,
    /// The user’s organization memberships (`/user/orgs`).
    Orgs,
}

impl RedirectKind {
    /// All kinds, in the order they appear on the home page.
    pub const ALL: [Self; 3] = [Self::Info, Self::Emails, Self::Orgs];

    /// The path segment appended to the redirect base URL.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Emails => "emails",
            Self::Orgs => "orgs",
        }
    }

    /// The OAuth scopes to request for this kind.
    #[must_use]
    pub const fn scopes(self) -> &'static [&'static str] {
        match self {
            Self::Info => &[],
            Self::Emails => &["user:email"],
            Self::Orgs => &["read:org"],
        }
    }

    /// The REST API path, relative to the API root.
    #[must_use]
    pub const fn resource_path(self) -> &'static str {
        match self {
            Self::Info => "user",
            Self::Emails => "user/emails",
            Self::Orgs => "user/orgs",
        }
    }
}

impl fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path_segment())
    }
}

impl FromStr for RedirectKind {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.path_segment() == input)
            .ok_or_else(|| Error::UnsupportedKind(input.to_owned()))
    }
}

/// The GitHub endpoints we talk to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoints {
    /// Where users are sent to grant access.
    pub authorize: Url,
    /// Where codes are exchanged for tokens.
    pub access_token: Url,
    /// `/user`
    pub user: Url,
    /// `/user/emails`
    pub user_emails: Url,
    /// `/user/orgs`
    pub user_orgs: Url,
}

impl Endpoints {
    /// Derive endpoints from a GitHub web root and a REST API root.
    ///
    /// Both may be given with or without a trailing slash; GitHub Enterprise
    /// roots like `https://ghe.example.com/api/v3` work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if either root cannot be a base URL.
    pub fn new(github_url: &Url, api_url: &Url) -> Result<Self> {
        let github_url = as_directory(github_url)?;
        let api_url = as_directory(api_url)?;
        let join = |base: &Url, path: &str| {
            base.join(path).map_err(|error| Error::Url {
                url: base.to_string(),
                reason: error.to_string(),
            })
        };

        Ok(Self {
            authorize: join(&github_url, "login/oauth/authorize")?,
            access_token: join(&github_url, "login/oauth/access_token")?,
            user: join(&api_url, RedirectKind::Info.resource_path())?,
            user_emails: join(&api_url, RedirectKind::Emails.resource_path())?,
            user_orgs: join(&api_url, RedirectKind::Orgs.resource_path())?,
        })
    }

    /// Create endpoints for a mock server serving both web and API paths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if `base` is not a valid base URL.
    pub fn with_base(base: &str) -> Result<Self> {
        let url = parse_url(base)?;
        Self::new(&url, &url)
    }

    /// Get the REST API endpoint for a redirect kind.
    #[must_use]
    pub const fn resource(&self, kind: RedirectKind) -> &Url {
        match kind {
            RedirectKind::Info => &self.user,
            RedirectKind::Emails => &self.user_emails,
            RedirectKind::Orgs => &self.user_orgs,
        }
    }
}

impl Default for Endpoints {
    /// The public GitHub endpoints.
    fn default() -> Self {
        Url::parse(GITHUB_URL)
            .ok()
            .zip(Url::parse(GITHUB_API_URL).ok())
            .and_then(|(web, api)| Self::new(&web, &api).ok())
            .expect("GitHub endpoint constants should be valid URLs")
    }
}

/// The authorize URL for every redirect kind, as shown on the home page.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthorizeUrls {
    /// Authorize URL for [`RedirectKind::Info`].
    pub user_info_url: Url,
    /// Authorize URL for [`RedirectKind::Emails`].
    pub user_emails_url: Url,
    /// Authorize URL for [`RedirectKind::Orgs`].
    pub user_orgs_url: Url,
}

impl AuthorizeUrls {
    /// Build authorize URLs for all kinds with their default scopes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Url`] if the redirect base URL is invalid.
    pub fn build(config: &OAuthConfig, endpoints: &Endpoints) -> Result<Self> {
        let build = |kind: RedirectKind| {
            build_authorize_url(config, endpoints, kind, kind.scopes())
        };

        Ok(Self {
            user_info_url: build(RedirectKind::Info)?,
            user_emails_url: build(RedirectKind::Emails)?,
            user_orgs_url: build(RedirectKind::Orgs)?,
        })
    }

    /// Iterate over `(kind, url)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (RedirectKind, &Url)> {
        [
            (RedirectKind::Info, &self.user_info_url),
            (RedirectKind::Emails, &self.user_emails_url),
            (RedirectKind::Orgs, &self.user_orgs_url),
        ]
        .into_iter()
    }
}

/// Build the URL GitHub should redirect back to for `kind`.
///
/// Empty path segments in `base` are dropped, so `http://x/cb//` and
/// `http://x/cb` both produce `http://x/cb/info`.
///
/// # Errors
///
/// Returns [`Error::Url`] if `base` is not a valid base URL.
pub fn redirect_url(base: &str, kind: RedirectKind) -> Result<Url> {
    let mut url = parse_url(base)?;
    if !url.cannot_be_a_base() {
        let path = url
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        url.set_path(&format!("/{path}"));
    }
    url.path_segments_mut()
        .map_err(|()| Error::Url {
            url: base.to_owned(),
            reason: "cannot be a base".to_owned(),
        })?
        .pop_if_empty()
        .push(kind.path_segment());
    Ok(url)
}

/// Build the URL that sends a user to GitHub to authorize this app.
///
/// `scope` is omitted entirely if `scopes` is empty.
///
/// # Errors
///
/// Returns [`Error::Url`] if the redirect base URL is invalid.
pub fn build_authorize_url(
    config: &OAuthConfig,
    endpoints: &Endpoints,
    kind: RedirectKind,
    scopes: &[&str],
) -> Result<Url> {
    let redirect = redirect_url(&config.redirect_base_url, kind)?;

    let mut url = endpoints.authorize.clone();
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("client_id", &config.client_id);
        query.append_pair("redirect_uri", redirect.as_str());
        if !scopes.is_empty() {
            query.append_pair("scope", &scopes.join(" "));
        }
    }
    Ok(url)
}

/// Build the URL used to exchange `code` for an access token.
#[must_use]
pub fn build_token_exchange_url(
    config: &OAuthConfig,
    endpoints: &Endpoints,
    code: &str,
) -> Url {
    let mut url = endpoints.access_token.clone();
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("client_secret", &config.client_secret)
        .append_pair("code", code);
    url
}

/// Parse a URL, converting the error to [`Error::Url`].
fn parse_url(input: &str) -> Result<Url> {
    Url::parse(input).map_err(|error| Error::Url {
        url: input.to_owned(),
        reason: error.to_string(),
    })
}

/// Make sure `url` ends in a slash so that joins append to its path.
fn as_directory(url: &Url) -> Result<Url> {
    if url.cannot_be_a_base() {
        return Err(Error::Url {
            url: url.to_string(),
            reason: "cannot be a base".to_owned(),
        });
    }

    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
