//! Decision types produced by the decoder

use ledger_core::Party;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// How an expense should be divided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAction {
    /// Even split
    #[serde(rename = "split_50_50")]
    Split5050,
    /// The other party reimburses the whole amount
    FullReimbursement,
    /// The payer bears the whole cost
    Gift,
    /// One named party bears the whole cost
    Personal,
    /// Needs a human decision; shares are placeholders
    ManualReview,
}

impl SplitAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitAction::Split5050 => "split_50_50",
            SplitAction::FullReimbursement => "full_reimbursement",
            SplitAction::Gift => "gift",
            SplitAction::Personal => "personal",
            SplitAction::ManualReview => "manual_review",
        }
    }
}

impl std::fmt::Display for SplitAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How sure the decoder is about a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(s)
    }
}

/// Outcome of decoding one description
///
/// `payer_share` is what the payer keeps; `other_share` is what the other
/// party owes. Values are unrounded; callers round to cents when posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitDecision {
    pub action: SplitAction,
    pub payer_share: Decimal,
    pub other_share: Decimal,
    pub reason: String,
    pub confidence: Confidence,
    /// Rule-specific values, stored as text
    pub extracted_data: BTreeMap<String, String>,
}

impl SplitDecision {
    pub(crate) fn new(
        action: SplitAction,
        payer_share: Decimal,
        other_share: Decimal,
        confidence: Confidence,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            action,
            payer_share,
            other_share,
            reason: reason.into(),
            confidence,
            extracted_data: BTreeMap::new(),
        }
    }

    pub(crate) fn with_data(mut self, key: &str, value: impl ToString) -> Self {
        self.extracted_data.insert(key.to_string(), value.to_string());
        self
    }

    /// Whether a person has to look at this before it is posted
    pub fn requires_review(&self) -> bool {
        self.action == SplitAction::ManualReview
    }

    /// Sum of both shares
    pub fn total(&self) -> Decimal {
        self.payer_share + self.other_share
    }

    /// Map the payer-relative shares onto `(ryan_share, jordyn_share)`
    pub fn shares_for(&self, payer: Party) -> (Decimal, Decimal) {
        match payer {
            Party::Ryan => (self.payer_share, self.other_share),
            Party::Jordyn => (self.other_share, self.payer_share),
        }
    }

    /// Parse a numeric entry of `extracted_data`
    pub fn extracted_decimal(&self, key: &str) -> Option<Decimal> {
        self.extracted_data
            .get(key)
            .and_then(|value| Decimal::from_str(value).ok())
    }
}
