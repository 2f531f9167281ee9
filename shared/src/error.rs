use std::io;

use thiserror::Error;

/// Failure surfaced by any of the app's external touch points.
///
/// Every variant is terminal for the operation that raised it; nothing in the
/// app retries or distinguishes transient from permanent failures.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("wallet error: {0}")]
    Wallet(String),
    #[error("qr encoding error: {0}")]
    Qr(String),
}

impl From<io::Error> for AppError {
    fn from(value: io::Error) -> Self {
        AppError::Backend(value.to_string())
    }
}
