//! HTTP implementation of the remote authority protocol.

pub mod http;
pub mod wire;

pub use http::HttpRemote;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the HTTP remote.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The server answered with a non-success status. The body is kept
    /// verbatim so the failure notification can quote it.
    #[error("server returned {status}: {body}")]
    Http { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed index row {index}: {reason}")]
    MalformedRow { index: usize, reason: String },

    #[error("invalid base URL: {0}")]
    BadUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, RemoteError>;
