//! Error types for the lp-app service layer.

/// Application error type that wraps errors from the backend crates
/// and provides a unified error interface for frontends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Panel error: {0}")]
    Panel(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for lp-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<lp_project::ProjectError> for AppError {
    fn from(err: lp_project::ProjectError) -> Self {
        AppError::Panel(err.to_string())
    }
}

impl From<lp_channels::ChannelError> for AppError {
    fn from(err: lp_channels::ChannelError) -> Self {
        AppError::Channel(err.to_string())
    }
}
