//! Errors encountered talking to GitHub.

use std::error::Error as _;
use std::fmt::Write as _;
use std::result;

/// `Result` type for `Error`.
pub type Result<T, E = Error> = result::Result<T, E>;

/// Errors encountered talking to GitHub.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The redirect base URL could not be used to build a callback URL.
    #[error("invalid redirect URL {url:?}: {reason}")]
    Url {
        /// The URL as configured.
        url: String,
        /// Why it couldn’t be used.
        reason: String,
    },

    /// The request could not be sent or the response could not be read.
    #[error("{}", describe_request_error(.0))]
    Request(#[from] reqwest::Error),

    /// GitHub responded with a non-success status.
    #[error("GitHub responded with {0}")]
    Status(reqwest::StatusCode),

    /// The response body was not the JSON we expected.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// GitHub returned an OAuth error instead of a token.
    #[error("{code}: {description}")]
    OAuth {
        /// The error code, e.g. `bad_verification_code`.
        code: String,
        /// The human readable description.
        description: String,
    },

    /// The token response had neither a token nor an error.
    #[error("no access token in response")]
    MissingAccessToken,

    /// The redirect kind is not one we know about.
    #[error("unsupported redirect kind: {0}")]
    UnsupportedKind(String),
}

/// Describe a transport error, including its causes.
///
/// reqwest’s own message leaves out the causes, e.g. “connection refused”.
fn describe_request_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return "request to GitHub timed out".to_owned();
    }

    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(message, ": {cause}");
        source = cause.source();
    }
    message
}
