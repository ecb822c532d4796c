//! Terraform adapter error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TerraformError {
    #[error("terraform not found. Please install it and make sure it is on PATH")]
    TerraformNotFound,

    #[error("terraform {operation} failed{}", format_status(.status))]
    CommandFailed {
        operation: String,
        status: Option<i32>,
    },

    #[error("terraform output is missing '{0}'")]
    MissingOutput(String),

    #[error("terraform output '{0}' is not a string value")]
    NonStringOutput(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(" with exit code {}", code),
        None => " (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, TerraformError>;
