//! Shared-expense ledger core
//!
//! Double-entry ledger of mutual debts between two people, Ryan and Jordyn.
//!
//! # Architecture
//!
//! - **Mirrored accounts**: each party has a receivable and a payable; every
//!   change to one side is mirrored on the other
//! - **Append-only log**: entries are validated at construction and never
//!   modified or deleted
//! - **Exact money**: fixed-point decimals, half-up rounding to cents
//! - **Single writer**: one engine per reconciliation run; [`SharedEngine`]
//!   serializes access when a host has several threads

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]
//!
//! # Invariants
//!
//! Checked after every posting, within $0.02:
//!
//! - Net positions sum to zero: `ryan_net + jordyn_net == 0`
//! - `ryan_receivable == jordyn_payable`
//! - `ryan_payable == jordyn_receivable`
//!
//! A violation is a defect in the engine and is returned as
//! [`Error::InvariantViolation`]; it is never corrected silently.

#![warn(missing_debug_implementations, clippy::all)]

pub mod audit;
pub mod config;
pub mod error;
pub mod ledger;
pub mod money;
pub mod settlement;
pub mod shared;
pub mod transaction;
pub mod types;

// Re-exports
pub use audit::AuditTrail;
pub use config::Config;
pub use error::{Error, Result};
pub use ledger::AccountingEngine;
pub use money::Money;
pub use settlement::{plan_settlement, SettlementPlan};
pub use shared::SharedEngine;
pub use transaction::{Metadata, Postings, Transaction};
pub use types::{AccountSummary, Balance, BalanceStatus, Party, TransactionCategory};
