use reqwest::StatusCode;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} responded with status {status}")]
    Status {
        endpoint: String,
        status: StatusCode,
    },
    #[error("could not read image {uri}: {reason}")]
    Image { uri: String, reason: String },
    #[error("invalid api base url {url}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl ClientError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Image { .. } | ClientError::BaseUrl { .. } => ErrorCode::Validation,
            ClientError::Transport { .. }
            | ClientError::Status { .. }
            | ClientError::Unavailable(_) => ErrorCode::Network,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(value: ClientError) -> Self {
        AppError::new(value.code(), value.to_string())
    }
}
