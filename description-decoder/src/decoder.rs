//! Ordered rule table that turns a free-text description into a split

use crate::expression;
use crate::patterns;
use crate::types::{Confidence, SplitAction, SplitDecision};
use ledger_core::Party;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Everything a rule may look at
struct DecodeInput<'a> {
    description: &'a str,
    lowered: String,
    amount: Decimal,
    payer: Option<Party>,
}

impl DecodeInput<'_> {
    fn half(&self) -> Decimal {
        self.amount / Decimal::TWO
    }
}

/// A rule returns `None` to let the next rule try
struct Rule {
    name: &'static str,
    apply: fn(&DecodeInput<'_>) -> Option<SplitDecision>,
}

/// Evaluated top to bottom; the first rule returning a decision wins
const RULES: &[Rule] = &[
    Rule {
        name: "full_reimbursement",
        apply: full_reimbursement,
    },
    Rule {
        name: "gift",
        apply: gift,
    },
    Rule {
        name: "personal",
        apply: personal,
    },
    Rule {
        name: "math_expression",
        apply: math_expression,
    },
    Rule {
        name: "exclusion",
        apply: exclusion,
    },
    Rule {
        name: "split_payment",
        apply: split_payment,
    },
    Rule {
        name: "unclear",
        apply: unclear,
    },
];

const DEFAULT_RULE: &str = "default";

/// Stateless description decoder
///
/// ```
/// use description_decoder::{DescriptionDecoder, SplitAction};
/// use ledger_core::Party;
/// use rust_decimal::Decimal;
///
/// let decoder = DescriptionDecoder::new();
/// let decision = decoder.decode("Shoes 100% Jordyn", Decimal::new(80, 0), Some(Party::Ryan));
///
/// assert_eq!(decision.action, SplitAction::Personal);
/// assert_eq!(decision.other_share, Decimal::new(80, 0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionDecoder;

impl DescriptionDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Rule names in evaluation order, ending with the fallback
    pub fn rule_names(&self) -> Vec<&'static str> {
        RULES
            .iter()
            .map(|rule| rule.name)
            .chain(std::iter::once(DEFAULT_RULE))
            .collect()
    }

    /// Decode `description` for an expense of `amount`
    ///
    /// Never fails; unrecognized text gets an even split.
    pub fn decode(&self, description: &str, amount: Decimal, payer: Option<Party>) -> SplitDecision {
        let input = DecodeInput {
            description,
            lowered: description.to_lowercase(),
            amount,
            payer,
        };

        for rule in RULES {
            if let Some(decision) = (rule.apply)(&input) {
                tracing::debug!(
                    rule = rule.name,
                    action = %decision.action,
                    confidence = %decision.confidence,
                    "Description decoded"
                );
                return decision;
            }
        }

        tracing::debug!(rule = DEFAULT_RULE, "No pattern matched, splitting evenly");
        SplitDecision::new(
            SplitAction::Split5050,
            input.half(),
            input.half(),
            Confidence::High,
            "No special pattern detected; default 50/50 split",
        )
    }

    /// Like [`decode`](Self::decode) with the payer given by name
    ///
    /// An unrecognized payer name is treated as unknown.
    pub fn decode_by_name(&self, description: &str, amount: Decimal, payer: Option<&str>) -> SplitDecision {
        let payer = payer.and_then(|name| match Party::from_str(name) {
            Ok(party) => Some(party),
            Err(_) => {
                tracing::warn!(payer = name, "Unrecognized payer name, treating payer as unknown");
                None
            }
        });
        self.decode(description, amount, payer)
    }
}

fn full_reimbursement(input: &DecodeInput<'_>) -> Option<SplitDecision> {
    let marker = patterns::FULL_REIMBURSEMENT.find(input.description)?;
    Some(
        SplitDecision::new(
            SplitAction::FullReimbursement,
            Decimal::ZERO,
            input.amount,
            Confidence::High,
            format!(
                "Full reimbursement marker '{}': other party owes the full amount",
                marker.as_str()
            ),
        )
        .with_data("marker", marker.as_str()),
    )
}

fn gift(input: &DecodeInput<'_>) -> Option<SplitDecision> {
    let keyword = patterns::longest_gift_keyword(&input.lowered)?;
    Some(
        SplitDecision::new(
            SplitAction::Gift,
            input.amount,
            Decimal::ZERO,
            Confidence::High,
            format!("Gift detected (keyword: '{}'); payer covers the cost", keyword),
        )
        .with_data("matched_keyword", keyword),
    )
}

fn personal(input: &DecodeInput<'_>) -> Option<SplitDecision> {
    let captures = patterns::PERSONAL.captures(input.description)?;
    let owner = Party::from_str(&captures[1]).ok()?;

    let decision = if input.payer == Some(owner) {
        SplitDecision::new(
            SplitAction::Personal,
            input.amount,
            Decimal::ZERO,
            Confidence::High,
            format!("Personal expense for {} paid by {}", owner, owner),
        )
    } else {
        SplitDecision::new(
            SplitAction::Personal,
            Decimal::ZERO,
            input.amount,
            Confidence::High,
            format!("Personal expense for {}; {} owes the full amount", owner, owner),
        )
    };
    Some(decision.with_data("personal_for", owner))
}

fn math_expression(input: &DecodeInput<'_>) -> Option<SplitDecision> {
    for group in expression::parenthesized_groups(input.description) {
        match expression::evaluate_detailed(group) {
            Ok(evaluation) if evaluation.binary_operations > 0 && evaluation.value >= Decimal::ZERO => {
                let half = evaluation.value / Decimal::TWO;
                return Some(
                    SplitDecision::new(
                        SplitAction::Split5050,
                        half,
                        half,
                        Confidence::Medium,
                        format!(
                            "Calculated amount from expression ({}) = {}",
                            group.trim(),
                            evaluation.value
                        ),
                    )
                    .with_data("original_expression", group.trim())
                    .with_data("calculated_amount", evaluation.value),
                );
            }
            Ok(evaluation) => {
                tracing::trace!(group, value = %evaluation.value, "Parenthesized text is not a usable expression");
            }
            Err(e) => {
                tracing::trace!(group, error = %e, "Parenthesized text did not evaluate");
            }
        }
    }
    None
}

fn exclusion(input: &DecodeInput<'_>) -> Option<SplitDecision> {
    let keyword = patterns::EXCLUSION_KEYWORD.find(input.description)?;
    let keyword = keyword.as_str().to_lowercase();

    let excluded = patterns::exclusion_amount(input.description)
        .and_then(|digits| Decimal::from_str(&digits).ok());

    let decision = match excluded {
        Some(excluded) => {
            // only underflows when the result would be clamped anyway
            let remaining = input
                .amount
                .checked_sub(excluded)
                .map_or(Decimal::ZERO, |rest| rest.max(Decimal::ZERO));
            let half = remaining / Decimal::TWO;
            SplitDecision::new(
                SplitAction::Split5050,
                half,
                half,
                Confidence::Medium,
                format!(
                    "Excluded ${} ({}); splitting remaining ${} evenly",
                    excluded, keyword, remaining
                ),
            )
            .with_data("excluded_amount", excluded)
            .with_data("remaining_amount", remaining)
        }
        None => SplitDecision::new(
            SplitAction::ManualReview,
            input.half(),
            input.half(),
            Confidence::Low,
            format!(
                "Found '{}' but could not determine the amount to exclude",
                keyword
            ),
        ),
    };
    Some(decision.with_data("keyword", keyword))
}

fn split_payment(input: &DecodeInput<'_>) -> Option<SplitDecision> {
    let marker = patterns::SPLIT_AMOUNTS
        .find(input.description)
        .or_else(|| patterns::SPLIT_INSTRUMENTS.find(input.description))?;
    Some(
        SplitDecision::new(
            SplitAction::ManualReview,
            input.half(),
            input.half(),
            Confidence::Low,
            "Payment was split across instruments; allocation needs review",
        )
        .with_data("marker", marker.as_str()),
    )
}

fn unclear(input: &DecodeInput<'_>) -> Option<SplitDecision> {
    let marker = patterns::first_unclear_marker(&input.lowered)?;
    Some(
        SplitDecision::new(
            SplitAction::ManualReview,
            input.half(),
            input.half(),
            Confidence::Low,
            format!("Description marked unclear ('{}'); needs review", marker),
        )
        .with_data("marker", marker),
    )
}
