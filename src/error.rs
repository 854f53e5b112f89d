use thiserror::Error;

/// Top-level error type for the entire application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Per-contract fetch errors during a reconciliation pass.
///
/// Contained per identifier: a failing contract is dropped from the
/// current pass and retried on the next tick. One bad contract must
/// never hide the others.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Contract not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication rejected by remote service")]
    Auth,
}

/// Best-effort "escrow confirmed" notification errors.
///
/// Logged and ignored by the engine; never aborts a pass or drops the
/// contract from the result list.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Network error: {0}")]
    Network(String),
}

/// Errors from explicit user-initiated actions (mark paid, cancel,
/// autologin token exchange). Surfaced synchronously, never retried
/// automatically.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Rejected by remote service: {0}")]
    RemoteRejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication rejected by remote service")]
    Auth,

    #[error("No signature key is stored locally")]
    MissingSignatureKey,
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Network(error.to_string())
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(error: reqwest::Error) -> Self {
        NotifyError::Network(error.to_string())
    }
}

impl From<reqwest::Error> for ActionError {
    fn from(error: reqwest::Error) -> Self {
        ActionError::Network(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::Store(format!("JSON error: {:?}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        AppError::Store(format!("IO error: {:?}", error))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal(format!("Error converting: {:?}", error))
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;
