//! Description decoder
//!
//! Reads the free-text description attached to a shared expense and decides
//! how it should be split between the payer and the other party.
//!
//! # Rules
//!
//! Evaluated in a fixed order; the first match wins:
//!
//! 1. Full reimbursement markers ("2x to calculate")
//! 2. Gift keywords
//! 3. Personal markers ("100% Jordyn")
//! 4. Arithmetic in parentheses, split evenly on the computed value
//! 5. Exclusions ("remove $150.00")
//! 6. Payments split across instruments (manual review)
//! 7. Unclear markers (manual review)
//! 8. Even split of the full amount
//!
//! Arithmetic is evaluated by a restricted parser in [`expression`]; text is
//! never executed.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations)]

pub mod decoder;
pub mod error;
pub mod expression;
pub mod patterns;
pub mod types;

// Re-exports
pub use decoder::DescriptionDecoder;
pub use error::{ExpressionError, Result};
pub use types::{Confidence, SplitAction, SplitDecision};
