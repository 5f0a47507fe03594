use reqwest::StatusCode;
use thiserror::Error;

/// Every failure the crate can report.
///
/// Fetch and authentication errors are fatal to a run. `Store` errors on a
/// single `put` and `Corrupt` errors during a scan are isolated by the
/// pipeline and only reported.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{label} not found in {location}")]
    NotFound {
        label: &'static str,
        location: String,
    },

    #[error("Cannot reach remote API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Remote API responded with HTTP {status}")]
    Http { status: StatusCode },

    #[error("Cannot decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Cannot decode stored value for key {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authorization failed: {0}")]
    Auth(String),
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Error::Store(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::Http { status },
            None => Error::Transport(err),
        }
    }
}
