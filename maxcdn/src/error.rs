use thiserror::Error;

/// Errors surfaced by the MaxCDN client.
#[derive(Debug, Error)]
pub enum Error {
    /// Endpoints are signed as bare URLs; query parameters must be passed
    /// separately so they can be included in the signature.
    #[error("endpoint must not contain a query string")]
    QueryInEndpoint,

    #[error("invalid API host: {0}")]
    InvalidHost(#[from] url::ParseError),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The vendor answered with an error envelope (or a non-JSON error
    /// body). `code` is the in-body code when present, otherwise the HTTP
    /// status.
    #[error("API error ({code}): {kind}: {message}")]
    Api {
        /// Vendor or HTTP status code.
        code: u16,
        /// Vendor error type, e.g. `unauthorized`.
        kind: String,
        /// Human-readable message from the envelope.
        message: String,
    },

    /// A spawned purge task failed to run to completion.
    #[error("purge task failed: {0}")]
    Batch(String),
}
