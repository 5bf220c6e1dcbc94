//! Stable error codes for callers and the CLI.

use serde::Serialize;
use thiserror::Error;

/// Exit code for command-line usage errors (sysexits `EX_USAGE`).
pub const USAGE_EXIT_CODE: i32 = 64;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Store is closed")]
    StoreClosed,

    #[error("Output failed: {0}")]
    Output(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::StoreClosed => "STORE_CLOSED",
            Self::Output(_) => "OUTPUT_ERROR",
        }
    }

    /// Process exit code used by the `store` binary.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) => 1,
            Self::StoreUnavailable(_) => 2,
            Self::Schema(_) => 3,
            Self::StoreClosed => 4,
            Self::Output(_) => 5,
        }
    }

    pub fn to_serde(&self) -> AppErrorDto {
        AppErrorDto {
            code: self.code().to_string(),
            message: self.to_string(),
            details: None,
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.starts_with("no such table") => {
                AppError::Schema(msg.clone())
            }
            _ => AppError::StoreUnavailable(e.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_serde().serialize(serializer)
    }
}

#[derive(Debug, Serialize)]
pub struct AppErrorDto {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}
