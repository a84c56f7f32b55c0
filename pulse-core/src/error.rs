use reqwest::StatusCode;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PulseError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] url::ParseError),

    #[error("Invalid Scheme: {0}")]
    InvalidScheme(String),

    #[error("Invalid paramter: {0} value: {1}")]
    InvalidParameter(String, String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("SSL Certificate error: {0}")]
    SSLCertificateError(String),

    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Encode error: compression failed: {0}")]
    Compression(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Transport error: unable to read response body ({status}): {source}")]
    BodyRead {
        status: StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Transport error: request task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("HTTP error: {status} {body}")]
    HttpStatus {
        status: StatusCode,
        body: String,
    },
}

impl PulseError {
    /// Status code returned by the remote service, if the request got that far.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            PulseError::HttpStatus { status, .. } | PulseError::BodyRead { status, .. } => Some(*status),
            PulseError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(
            self,
            PulseError::Config(_)
                | PulseError::InvalidUri(_)
                | PulseError::InvalidScheme(_)
                | PulseError::InvalidParameter(..)
                | PulseError::InvalidSchema(_)
                | PulseError::SSLCertificateError(_)
        )
    }
}
