//! CLI command handlers (output boundary).

pub mod person;
pub mod store;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn output_err(e: impl std::fmt::Display) -> AppError {
    AppError::Output(e.to_string())
}
