//! Settlement planning
//!
//! A settlement is a real transfer from one party to the other. It first pays
//! down whatever the sender owes; anything left over becomes a debt in the
//! opposite direction, with the sender now the creditor.
//!
//! # Example
//!
//! ```text
//! Ryan owes Jordyn:        $100
//! Ryan sends Jordyn:       $150
//!
//! reduction = min(150, 100) = $100   (debt cleared)
//! reversal  = 150 - 100     = $50    (Jordyn now owes Ryan)
//! ```

use crate::Money;
use serde::{Deserialize, Serialize};

/// Outcome of applying a transfer against an outstanding debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Amount transferred
    pub amount: Money,
    /// Portion that pays down the sender's existing debt
    pub reduction: Money,
    /// Excess that becomes a debt owed back to the sender
    pub reversal: Money,
}

impl SettlementPlan {
    /// True if the transfer exceeded the outstanding debt
    pub fn is_overpayment(&self) -> bool {
        self.reversal.is_positive()
    }
}

/// Split a transfer into debt reduction and overpayment reversal.
///
/// `currently_owed` is what the sender owes the receiver before the transfer;
/// a negative value is treated as nothing owed.
pub fn plan_settlement(amount: Money, currently_owed: Money) -> SettlementPlan {
    let owed = currently_owed.max(Money::ZERO);
    let reduction = amount.min(owed);
    let remaining = amount - reduction;
    let reversal = if remaining.is_positive() {
        remaining
    } else {
        Money::ZERO
    };

    SettlementPlan {
        amount,
        reduction,
        reversal,
    }
}
