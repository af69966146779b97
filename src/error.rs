//! Error types and constructors.
//!
//! Two layers of failure exist in the advisor:
//!
//! - [`CatalogError`] - a schema lookup referenced a table or column absent
//!   from the catalog. Recovered locally: the engine skips the failing rule
//!   for that query and keeps the remaining findings.
//! - [`AppError`] - fatal for a single operation: a structurally invalid
//!   query model, unreadable config, malformed catalog input.

use thiserror::Error;

pub use masterror::{AppError, AppResult};

/// Schema lookup failure, recoverable at the rule level.
///
/// Rules propagate this with `?`; the engine turns it into a debug-level
/// note and drops the rule's findings for that query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    #[error("unknown column '{table}.{column}'")]
    UnknownColumn { table: String, column: String }
}

impl CatalogError {
    pub fn unknown_table(table: impl Into<String>) -> Self {
        Self::UnknownTable(table.into())
    }

    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table:  table.into(),
            column: column.into()
        }
    }
}

/// Create error for a query model that violates structural invariants
pub fn malformed_query_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(format!("Malformed query model: {}", message.into()))
}

/// Create error for catalog input that fails validation or deserialization
pub fn catalog_load_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(format!("Catalog load error: {}", message.into()))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}
