use std::time::Duration;
use thiserror::Error;

/// Failures at the enrichment-service boundary. Never leaves the gateway:
/// every variant is logged and converted to the documented safe default.
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("service disabled")]
    Disabled,

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

impl EnrichmentError {
    /// Short label used as a metrics/log field.
    pub fn kind(&self) -> &'static str {
        match self {
            EnrichmentError::Disabled => "disabled",
            EnrichmentError::Transport(_) => "transport",
            EnrichmentError::Status(_) => "status",
            EnrichmentError::Malformed(_) => "malformed",
            EnrichmentError::Timeout(_) => "timeout",
        }
    }
}
