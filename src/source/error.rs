use thiserror::Error;

/// Errors raised by the lot API and the price channel.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Unknown resource '{resource}'")]
    UnknownResource { resource: String },

    #[error("Invalid price channel '{channel}', expected 'price-{{id}}'")]
    InvalidChannel { channel: String },

    #[error("Failed to decode lot fixture: {source}")]
    Fixture {
        #[source]
        source: serde_json::Error,
    },
}
