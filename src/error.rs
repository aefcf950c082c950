//! Errors raised while talking to the RSCS backend.
//!
//! The dashboard shows these messages verbatim in its error region, so each
//! variant renders a complete, human-readable sentence naming the endpoint.

/// Errors from RSCS API calls.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The configured base URL cannot carry the requested path.
    #[error("invalid URL for {endpoint}: {reason}")]
    InvalidUrl { endpoint: String, reason: String },

    /// Transport failure: connection refused, timeout, TLS, body read.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The body was not the JSON shape the endpoint promises.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// The endpoint path the failed request targeted.
    pub fn endpoint(&self) -> &str {
        match self {
            FetchError::InvalidUrl { endpoint, .. }
            | FetchError::Http { endpoint, .. }
            | FetchError::Status { endpoint, .. }
            | FetchError::Decode { endpoint, .. } => endpoint,
        }
    }
}
