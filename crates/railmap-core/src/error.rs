use thiserror::Error;

/// Failures while obtaining or decoding the network payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Unexpected HTTP status {0}")]
    Status(u16),
    #[error("Invalid JSON payload: {0}")]
    Decode(String),
    #[error("Payload is missing the `{0}` collection")]
    MissingCollection(&'static str),
    #[error("Could not read payload: {0}")]
    Io(String),
}

impl NetworkError {
    /// Malformed payloads are distinct from transport failures: the provider answered,
    /// but with nothing usable.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::MissingCollection(_))
    }
}
