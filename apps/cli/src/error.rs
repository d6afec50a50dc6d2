//! # CLI Error Type
//!
//! Every failure the binary can report, rendered to stderr as
//!
//! ```json
//! { "code": "STOCK_EXCEEDED", "message": "Insufficient stock for product 1: ..." }
//! ```
//!
//! Cart failures keep their [`ErrorCode`]; setup failures get their own codes.

use rocketcart_core::{CartError, CartOperation, ErrorCode};
use rocketcart_db::DbError;
use rocketcart_engine::EngineError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

/// What the user sees on stderr.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: String,
    pub message: String,

    /// The notice the storefront would show, for cart failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl CliError {
    /// Returns the machine-readable code.
    pub fn code(&self) -> String {
        match self {
            CliError::Cart(e) => e.kind().to_string(),
            CliError::Engine(e) if e.is_config_error() => "CONFIG_ERROR".to_string(),
            CliError::Engine(_) => "ENGINE_ERROR".to_string(),
            CliError::Database(_) => ErrorCode::PersistenceFailure.to_string(),
            CliError::Output(_) => "OUTPUT_ERROR".to_string(),
        }
    }

    /// Builds the stderr report.
    ///
    /// A cart failure carries the notice for `operation`. This is the only
    /// place the CLI renders it.
    pub fn report(&self, operation: Option<CartOperation>) -> ErrorReport {
        let notice = match (self, operation) {
            (CliError::Cart(e), Some(op)) => Some(e.notice(op).message),
            _ => None,
        };

        ErrorReport {
            code: self.code(),
            message: self.to_string(),
            notice,
        }
    }
}
