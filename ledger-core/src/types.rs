//! Core types for the ledger
//!
//! All types are designed for:
//! - Exact arithmetic (Decimal-backed [`Money`])
//! - A closed set of parties, so invalid payer strings cannot reach the engine
//! - Stable serialization for the audit trail

use crate::{Error, Money, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two people sharing expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Party {
    /// Ryan
    Ryan,
    /// Jordyn
    Jordyn,
}

impl Party {
    /// Both parties, in a fixed order
    pub const ALL: [Party; 2] = [Party::Ryan, Party::Jordyn];

    /// The counterparty
    pub fn other(&self) -> Party {
        match self {
            Party::Ryan => Party::Jordyn,
            Party::Jordyn => Party::Ryan,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Party::Ryan => "Ryan",
            Party::Jordyn => "Jordyn",
        }
    }
}

impl FromStr for Party {
    type Err = Error;

    /// Case-insensitive, whitespace-trimmed
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("ryan") {
            Ok(Party::Ryan)
        } else if trimmed.eq_ignore_ascii_case("jordyn") {
            Ok(Party::Jordyn)
        } else {
            Err(Error::InvalidArgument(format!(
                "unknown party '{}' (expected Ryan or Jordyn)",
                s
            )))
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category tag on a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    /// Shared purchase paid by one party
    Expense,
    /// Monthly rent, paid to the landlord by Jordyn
    Rent,
    /// Real money transfer between the parties
    Settlement,
}

impl TransactionCategory {
    /// Lowercase tag
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::Expense => "expense",
            TransactionCategory::Rent => "rent",
            TransactionCategory::Settlement => "settlement",
        }
    }
}

impl fmt::Display for TransactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the outstanding debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceStatus {
    /// Net position favours Ryan
    JordynOwesRyan,
    /// Net position favours Jordyn
    RyanOwesJordyn,
    /// Within tolerance of zero
    Balanced,
}

impl BalanceStatus {
    /// Human-readable status used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceStatus::JordynOwesRyan => "Jordyn owes Ryan",
            BalanceStatus::RyanOwesJordyn => "Ryan owes Jordyn",
            BalanceStatus::Balanced => "Balanced",
        }
    }

    /// The party owing money, if any
    pub fn debtor(&self) -> Option<Party> {
        match self {
            BalanceStatus::JordynOwesRyan => Some(Party::Jordyn),
            BalanceStatus::RyanOwesJordyn => Some(Party::Ryan),
            BalanceStatus::Balanced => None,
        }
    }
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current balance between the parties. `amount` is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Who owes whom
    pub status: BalanceStatus,
    /// Outstanding amount
    pub amount: Money,
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            BalanceStatus::Balanced => f.write_str("Balanced"),
            status => write!(f, "{} ${}", status, self.amount),
        }
    }
}

/// Snapshot of the four mirrored accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Amount Jordyn owes Ryan (Ryan's asset)
    pub ryan_receivable: Money,
    /// Amount Ryan owes Jordyn (Ryan's liability)
    pub ryan_payable: Money,
    /// Amount Ryan owes Jordyn (Jordyn's asset)
    pub jordyn_receivable: Money,
    /// Amount Jordyn owes Ryan (Jordyn's liability)
    pub jordyn_payable: Money,
    /// Ryan's receivable minus payable
    pub ryan_net: Money,
    /// Jordyn's receivable minus payable
    pub jordyn_net: Money,
    /// Rendered balance, e.g. "Jordyn owes Ryan $50.00"
    pub current_balance: String,
    /// Entries in the log
    pub transaction_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_parse_case_insensitive() {
        assert_eq!("RYAN".parse::<Party>().unwrap(), Party::Ryan);
        assert_eq!("  jordyn ".parse::<Party>().unwrap(), Party::Jordyn);
        assert!("Ryann".parse::<Party>().is_err());
        assert!("".parse::<Party>().is_err());
    }

    #[test]
    fn test_party_other() {
        assert_eq!(Party::Ryan.other(), Party::Jordyn);
        assert_eq!(Party::Jordyn.other(), Party::Ryan);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&TransactionCategory::Settlement).unwrap();
        assert_eq!(json, "\"settlement\"");
    }

    #[test]
    fn test_balance_display() {
        let balance = Balance {
            status: BalanceStatus::JordynOwesRyan,
            amount: Money::from(50),
        };
        assert_eq!(balance.to_string(), "Jordyn owes Ryan $50.00");
        assert_eq!(balance.status.debtor(), Some(Party::Jordyn));

        let even = Balance {
            status: BalanceStatus::Balanced,
            amount: Money::ZERO,
        };
        assert_eq!(even.to_string(), "Balanced");
    }
}
