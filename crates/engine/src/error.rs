//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidTransition`] thrown when a transaction status change is not
//!   allowed by the transition table.
//! - [`InvalidStatus`] thrown when a wire status code or name is unknown.
//! - [`InvalidDate`] thrown when a value cannot be read as a calendar day.
//!
//!  [`InvalidTransition`]: EngineError::InvalidTransition
//!  [`InvalidStatus`]: EngineError::InvalidStatus
//!  [`InvalidDate`]: EngineError::InvalidDate
use thiserror::Error;

use crate::TransactionStatus;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: TransactionStatus,
        to: TransactionStatus,
    },
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Invalid date: \"{0}\"")]
    InvalidDate(String),
}
