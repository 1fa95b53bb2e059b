//! Error types for the registry

use crate::types::Address;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Registry errors
///
/// Every constraint violation surfaces here as the operation's outcome; on
/// any error the operation's state changes are fully rolled back.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-owner attempted an owner-only operation
    #[error("Unauthorized: caller {0} is not the owner")]
    Unauthorized(Address),

    /// Malformed input (mismatched speaker arrays, etc.)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reference to a nonexistent talk id
    #[error("Talk not found: {0}")]
    TalkNotFound(u64),

    /// Talk was already canceled
    #[error("Talk already canceled: {0}")]
    AlreadyCanceled(u64),

    /// Attendee is already registered
    #[error("Already registered: {0}")]
    AlreadyRegistered(Address),

    /// Attached payment is below the registration price
    #[error("Insufficient payment: required {required}, provided {provided}")]
    InsufficientPayment {
        /// The fixed registration price
        required: Decimal,
        /// The value attached by the caller
        provided: Decimal,
    },

    /// Withdrawal exceeds the custodied balance
    #[error("Insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Current custody balance
        available: Decimal,
        /// Requested withdrawal amount
        requested: Decimal,
    },

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
