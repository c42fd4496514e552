//! Server configuration.
//!
//! Configuration comes from an optional TOML file and from command line flags
//! or environment variables, which take precedence. It is resolved once at
//! startup into a [`Config`] and never changes afterward.

use crate::github::{self, Endpoints, GITHUB_API_URL, GITHUB_URL};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use std::{fs, io, result};
use url::Url;

/// `Result` type for `Error`.
pub type Result<T, E = Error> = result::Result<T, E>;

/// How long to wait for GitHub by default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors encountered loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("could not read {path:?}: {source}")]
    Io {
        /// The configuration file.
        path: String,
        /// The underlying error.
        source: io::Error,
    },

    /// An error encountered parsing the TOML configuration.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// A required setting was not provided anywhere.
    #[error("missing required setting {0:?}")]
    Missing(&'static str),

    /// A URL setting was unusable.
    #[error(transparent)]
    Url(#[from] github::Error),
}

/// The GitHub OAuth app credentials and callback location.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OAuthConfig {
    /// The GitHub client ID for OAuth.
    pub client_id: String,
    /// The GitHub client secret for OAuth.
    pub client_secret: String,
    /// The callback URL registered with GitHub; kinds are appended to it.
    pub redirect_base_url: String,
}

/// Fully resolved configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// OAuth app settings.
    pub oauth: OAuthConfig,
    /// GitHub endpoints.
    pub endpoints: Endpoints,
    /// Timeout for requests to GitHub, or `None` to wait forever.
    pub timeout: Option<Duration>,
}

/// Configuration as it appears in a file, or on the command line.
///
/// Every field is optional so that sources can be layered with
/// [`Settings::merge()`] before being checked with [`Settings::resolve()`].
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// The GitHub client ID for OAuth.
    pub client_id: Option<String>,
    /// The GitHub client secret for OAuth.
    pub client_secret: Option<String>,
    /// The callback URL registered with GitHub.
    pub redirect_url: Option<String>,
    /// Timeout in seconds for requests to GitHub; 0 disables it.
    pub timeout: Option<u64>,
    /// The GitHub web root, for GitHub Enterprise.
    pub github_url: Option<Url>,
    /// The GitHub REST API root, for GitHub Enterprise.
    pub api_url: Option<Url>,
}

impl Settings {
    /// Parse a TOML configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use assert2::assert;
    /// use github_login::config::Settings;
    ///
    /// assert!(
    ///     Settings::parse(
    ///         r#"
    ///         client_id = "Iv1.0123"
    ///         redirect_url = "http://localhost:8080/oauth/redirect"
    ///         "#
    ///     )
    ///     .unwrap()
    ///         == Settings {
    ///             client_id: Some("Iv1.0123".to_owned()),
    ///             redirect_url: Some(
    ///                 "http://localhost:8080/oauth/redirect".to_owned()
    ///             ),
    ///             ..Settings::default()
    ///         },
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if it can’t parse the configuration.
    pub fn parse(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can’t be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&input)
    }

    /// Layer `overrides` on top of `self`.
    ///
    /// Any setting present in `overrides` wins.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            client_id: overrides.client_id.or(self.client_id),
            client_secret: overrides.client_secret.or(self.client_secret),
            redirect_url: overrides.redirect_url.or(self.redirect_url),
            timeout: overrides.timeout.or(self.timeout),
            github_url: overrides.github_url.or(self.github_url),
            api_url: overrides.api_url.or(self.api_url),
        }
    }

    /// Check settings and fill in defaults.
    ///
    /// The redirect URL is checked here so that a bad value stops the server
    /// from starting rather than failing every home page request.
    ///
    /// # Errors
    ///
    /// Returns an error if a required setting is missing or a URL is unusable.
    pub fn resolve(self) -> Result<Config> {
        let oauth = OAuthConfig {
            client_id: self.client_id.ok_or(Error::Missing("client_id"))?,
            client_secret: self
                .client_secret
                .ok_or(Error::Missing("client_secret"))?,
            redirect_base_url: self
                .redirect_url
                .ok_or(Error::Missing("redirect_url"))?,
        };
        github::redirect_url(
            &oauth.redirect_base_url,
            github::RedirectKind::Info,
        )?;

        let endpoints = match (self.github_url, self.api_url) {
            (None, None) => Endpoints::default(),
            (github_url, api_url) => Endpoints::new(
                &github_url.map_or_else(|| default_url(GITHUB_URL), Ok)?,
                &api_url.map_or_else(|| default_url(GITHUB_API_URL), Ok)?,
            )?,
        };

        let timeout = match self.timeout {
            None => Some(DEFAULT_TIMEOUT),
            Some(0) => None,
            Some(seconds) => Some(Duration::from_secs(seconds)),
        };

        Ok(Config { oauth, endpoints, timeout })
    }
}

/// Parse one of the default GitHub URL constants.
fn default_url(input: &str) -> Result<Url> {
    Url::parse(input).map_err(|error| {
        Error::Url(github::Error::Url {
            url: input.to_owned(),
            reason: error.to_string(),
        })
    })
}
