//! The module contains the error the engine can throw.
//!
//! The core computations never fail: they follow the permissive behavior and
//! skip what they cannot attribute. Errors are raised only by the
//! [`Engine`](crate::Engine) pipeline when it runs with
//! [`InputPolicy::Strict`](crate::InputPolicy::Strict), and by lookups such as
//! [`find_expense`](crate::find_expense).
//!
//! The errors are:
//!
//! - [`UnknownPayer`] thrown when the payer is not in the roster.
//! - [`UnknownParticipant`] thrown when a split names someone outside it.
//! - [`CustomSplitMismatch`] thrown when custom shares do not add up.
//!
//!  [`UnknownParticipant`]: EngineError::UnknownParticipant
//!  [`UnknownPayer`]: EngineError::UnknownPayer
//!  [`CustomSplitMismatch`]: EngineError::CustomSplitMismatch
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Empty split: {0}")]
    EmptySplit(String),
    #[error("Unknown payer: {0}")]
    UnknownPayer(String),
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),
    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Custom split mismatch: {0}")]
    CustomSplitMismatch(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
}
