use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Error, Debug, Clone)]
pub enum RelayError {
    #[error("Failed to forward events to coordinator: {0}")]
    ForwardFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
