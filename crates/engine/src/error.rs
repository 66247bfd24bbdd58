//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`MalformedEntry`] thrown when a ledger entry carries an amount that is
//!   not a valid decimal. The whole report fails: a partial financial report
//!   is worse than none.
//! - [`InvalidAmount`] thrown by [`Money`] parsing; the normalizer turns it
//!   into [`MalformedEntry`] before it reaches the caller.
//! - [`DivisionByZero`] thrown by [`Money`] divisions. Every division is
//!   guarded, so seeing it means the engine has a bug.
//! - [`Source`] thrown when an external collaborator (ledger store, catalog)
//!   fails.
//!
//!  [`MalformedEntry`]: EngineError::MalformedEntry
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`DivisionByZero`]: EngineError::DivisionByZero
//!  [`Source`]: EngineError::Source
//!  [`Money`]: super::money::Money
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Malformed ledger entry \"{id}\": {reason}")]
    MalformedEntry { id: String, reason: String },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Ledger source error: {0}")]
    Source(String),
}
