//! Error types for the ledger

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Double-entry invariant violation (money created or destroyed)
    #[error("Invariant violation: {invariant} (left = {left}, right = {right})")]
    InvariantViolation {
        /// Which invariant failed
        invariant: &'static str,
        /// Left-hand side of the failed comparison
        left: Decimal,
        /// Right-hand side of the failed comparison
        right: Decimal,
    },

    /// Ledger entry whose debits and credits do not match
    #[error("Unbalanced entry: debits {debits} != credits {credits}")]
    UnbalancedEntry {
        /// Sum of debit columns
        debits: Decimal,
        /// Sum of credit columns
        credits: Decimal,
    },

    /// Malformed party, direction, amount or percentage
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors that indicate a defect in the engine rather than bad input.
    ///
    /// Callers must stop processing on these; they are never recoverable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::InvariantViolation { .. } | Error::UnbalancedEntry { .. }
        )
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        let err = Error::InvariantViolation {
            invariant: "ryan_receivable == jordyn_payable",
            left: Decimal::new(5000, 2),
            right: Decimal::new(4900, 2),
        };
        assert!(err.is_fatal());
        assert!(err.to_string().contains("50.00"));
        assert!(err.to_string().contains("49.00"));

        assert!(!Error::invalid("bad payer").is_fatal());
    }

    #[test]
    fn test_io_error_propagates() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_fatal());
    }
}
