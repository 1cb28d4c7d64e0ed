//! Immutable ledger entries
//!
//! A [`Transaction`] is validated against the accounting equation when it is
//! built; an unbalanced entry never exists, so it can never reach the log.

use crate::{Error, Money, Party, Result, TransactionCategory};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Maximum allowed gap between debits and credits on one entry ($0.01)
pub const ENTRY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Free-form key/value annotations carried on an entry
pub type Metadata = BTreeMap<String, String>;

/// The four monetary columns of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Postings {
    /// Ryan debit column
    pub ryan_debit: Money,
    /// Ryan credit column
    pub ryan_credit: Money,
    /// Jordyn debit column
    pub jordyn_debit: Money,
    /// Jordyn credit column
    pub jordyn_credit: Money,
}

impl Postings {
    /// `creditor` is owed `amount` by the other party.
    ///
    /// The creditor's credit column and the debtor's debit column both carry
    /// the amount, so the entry balances by construction.
    pub fn owed_to(creditor: Party, amount: Money) -> Self {
        match creditor {
            Party::Ryan => Self {
                ryan_credit: amount,
                jordyn_debit: amount,
                ..Self::default()
            },
            Party::Jordyn => Self {
                jordyn_credit: amount,
                ryan_debit: amount,
                ..Self::default()
            },
        }
    }

    /// Sum of both debit columns
    pub fn total_debits(&self) -> Money {
        self.ryan_debit + self.jordyn_debit
    }

    /// Sum of both credit columns
    pub fn total_credits(&self) -> Money {
        self.ryan_credit + self.jordyn_credit
    }

    /// Check `debits == credits` within [`ENTRY_TOLERANCE`]
    pub fn verify(&self) -> Result<()> {
        let debits = self.total_debits();
        let credits = self.total_credits();
        if !debits.approx_eq(credits, ENTRY_TOLERANCE) {
            return Err(Error::UnbalancedEntry {
                debits: debits.amount(),
                credits: credits.amount(),
            });
        }
        Ok(())
    }
}

/// One entry in the append-only ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    date: NaiveDate,
    category: TransactionCategory,
    description: String,
    #[serde(flatten)]
    postings: Postings,
    #[serde(default)]
    metadata: Metadata,
    created_at: DateTime<Utc>,
}

impl Transaction {
    /// Build an entry, rejecting it if debits and credits disagree
    pub fn new(
        date: NaiveDate,
        category: TransactionCategory,
        description: impl Into<String>,
        postings: Postings,
        metadata: Metadata,
    ) -> Result<Self> {
        postings.verify()?;

        Ok(Self {
            id: Uuid::now_v7(),
            date,
            category,
            description: description.into(),
            postings,
            metadata,
            created_at: Utc::now(),
        })
    }

    /// Re-check the accounting equation (used when reading entries back)
    pub fn verify(&self) -> Result<()> {
        self.postings.verify()
    }

    /// Entry ID (UUIDv7, time-ordered)
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Business date of the underlying transaction
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Category tag
    pub fn category(&self) -> TransactionCategory {
        self.category
    }

    /// Free-text description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// All four monetary columns
    pub fn postings(&self) -> &Postings {
        &self.postings
    }

    /// Ryan debit column
    pub fn ryan_debit(&self) -> Money {
        self.postings.ryan_debit
    }

    /// Ryan credit column
    pub fn ryan_credit(&self) -> Money {
        self.postings.ryan_credit
    }

    /// Jordyn debit column
    pub fn jordyn_debit(&self) -> Money {
        self.postings.jordyn_debit
    }

    /// Jordyn credit column
    pub fn jordyn_credit(&self) -> Money {
        self.postings.jordyn_credit
    }

    /// Annotations
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// When the entry was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
