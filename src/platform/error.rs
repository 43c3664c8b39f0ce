//! Error types shared by messaging platform clients.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`PlatformError`] failures.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Failures that can occur while talking to the chat platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Required environment variable is missing.
    #[error("missing platform environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build platform HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// A request could not be sent.
    #[error("failed to send platform request to `{path}`")]
    RequestSend {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The platform answered with an unexpected status code.
    #[error("unexpected platform response status {status} for `{path}`")]
    RequestStatus { path: String, status: StatusCode },
    /// Response payload could not be decoded.
    #[error("failed to decode platform response for `{path}`")]
    DecodeResponse {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}
