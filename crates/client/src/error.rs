use stockdesk_core::errors::DomainError;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("no active session; log in first")]
    Unauthenticated,
    #[error("credentials rejected: {0}")]
    Unauthorized(String),
    #[error("operation requires an admin session")]
    Forbidden,
    #[error(transparent)]
    Invalid(#[from] DomainError),
    #[error("network error: {0}")]
    Network(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("client configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Stable snake_case class used in CLI outcomes and log fields.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Unauthenticated | Self::Unauthorized(_) => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::Invalid(_) | Self::Rejected(_) => "validation",
            Self::Network(_) => "network",
            Self::NotFound(_) => "not_found",
            Self::Api { .. } => "api",
            Self::Decode(_) => "decode",
            Self::Config(_) => "config",
        }
    }
}
