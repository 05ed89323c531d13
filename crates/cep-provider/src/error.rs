use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build http client: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
