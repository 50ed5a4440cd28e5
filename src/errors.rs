use gofinances_config::ConfigError;
use gofinances_core::CoreError;
use thiserror::Error;

/// Error type surfaced by the application facade.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Core(CoreError::Validation(_)) => "Please review the highlighted fields.",
            AppError::Core(CoreError::NotSignedIn) => "Sign in to continue.",
            AppError::Core(CoreError::Identity(_)) => "Could not sign in. Please try again.",
            AppError::Core(_) => "Could not access your data. Please try again.",
            AppError::Config(_) => "Could not read the application settings.",
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
