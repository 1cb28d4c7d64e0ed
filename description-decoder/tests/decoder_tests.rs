//! Decoder behavior through the public API, including posting the decisions

use chrono::NaiveDate;
use description_decoder::{Confidence, DescriptionDecoder, SplitAction};
use ledger_core::{AccountingEngine, BalanceStatus, Money, Party};
use rust_decimal::Decimal;
use std::str::FromStr;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn test_priority_order() {
    init_tracing();
    let decoder = DescriptionDecoder::new();
    let cases = [
        ("Christmas dinner x2 to calc", SplitAction::FullReimbursement),
        ("Anniversary flowers 100% Ryan", SplitAction::Gift),
        ("Jacket 100% Ryan (40 + 20)", SplitAction::Personal),
        ("Groceries (30 + 20) remove $5", SplitAction::Split5050),
        ("Remove $5, split $10 card $20 cash", SplitAction::Split5050),
        ("Split $10 card and $20 cash, discuss", SplitAction::ManualReview),
        ("Not sure what this was", SplitAction::ManualReview),
        ("Gas", SplitAction::Split5050),
    ];

    for (description, expected) in cases {
        let decision = decoder.decode(description, dec("60"), Some(Party::Jordyn));
        assert_eq!(decision.action, expected, "{}", description);
    }

    // expression wins over exclusion
    let d = decoder.decode("Groceries (30 + 20) remove $5", dec("60"), None);
    assert_eq!(d.extracted_decimal("calculated_amount"), Some(dec("50")));
    assert!(!d.extracted_data.contains_key("excluded_amount"));
}

#[test]
fn test_documented_cases() {
    let decoder = DescriptionDecoder::new();
    let hundred = dec("100.00");

    let d = decoder.decode("Birthday gift \u{2014} 2x to calculate", hundred, Some(Party::Ryan));
    assert_eq!(d.action, SplitAction::FullReimbursement);
    assert_eq!(d.other_share, hundred);

    let d = decoder.decode("Remove $150.00 from total", hundred, Some(Party::Ryan));
    assert_eq!(d.extracted_decimal("remaining_amount"), Some(Decimal::ZERO));
    assert_eq!((d.payer_share, d.other_share), (Decimal::ZERO, Decimal::ZERO));

    let d = decoder.decode("Target (45.00 + 12.99 - 5.00)", hundred, Some(Party::Ryan));
    assert_eq!(d.extracted_decimal("calculated_amount"), Some(dec("52.99")));
    assert_eq!(d.payer_share, dec("26.495"));
    assert_eq!(d.other_share, dec("26.495"));

    let d = decoder.decode("Evil (__import__('os').system('x'))", hundred, Some(Party::Ryan));
    assert_eq!(d.action, SplitAction::Split5050);
    assert_eq!(d.confidence, Confidence::High);

    let d = decoder.decode("Split $14.33 Card / $29.06 EBT", dec("43.39"), Some(Party::Jordyn));
    assert!(d.requires_review());
    assert_eq!(d.confidence, Confidence::Low);

    let d = decoder.decode("", hundred, None);
    assert_eq!(d.action, SplitAction::Split5050);
    assert_eq!(d.total(), hundred);
}

#[test]
fn test_decisions_are_deterministic() {
    let decoder = DescriptionDecoder::new();
    let descriptions = [
        "Target (45.00 + 12.99 - 5)",
        "Remove $150.00 from total",
        "Lost receipt ???",
        "Birthday present",
    ];

    for description in descriptions {
        let first = decoder.decode(description, dec("123.45"), Some(Party::Ryan));
        let second = decoder.decode(description, dec("123.45"), Some(Party::Ryan));
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_decision_serialization() {
    let decision = DescriptionDecoder::new().decode("Remove $150.00 from total", dec("400"), None);
    let json = serde_json::to_value(&decision).unwrap();

    assert_eq!(json["action"], "split_50_50");
    assert_eq!(json["confidence"], "medium");
    assert_eq!(json["extracted_data"]["excluded_amount"], "150.00");
}

#[test]
fn test_manual_review_shares_are_placeholders() {
    let decoder = DescriptionDecoder::new();
    for description in ["Need to reassess", "Difficult to determine", "Costco cash/EBT"] {
        let d = decoder.decode(description, dec("80.50"), None);
        assert!(d.requires_review(), "{}", description);
        assert_eq!(d.confidence, Confidence::Low);
        assert_eq!(d.total(), dec("80.50"));
    }
}

#[test]
fn test_decoded_expenses_post_to_engine() {
    init_tracing();
    let decoder = DescriptionDecoder::new();
    let mut engine = AccountingEngine::new();
    let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

    let expenses = [
        ("Groceries", "100.00", Party::Ryan),
        ("Shoes 100% Jordyn", "80.00", Party::Ryan),
        ("Birthday gift for Ryan", "45.00", Party::Jordyn),
        ("Target (45.00 + 12.99 - 5)", "57.99", Party::Jordyn),
        ("Lost receipt, discuss", "30.00", Party::Ryan),
    ];

    let mut held_for_review = 0;
    for (description, amount, payer) in expenses {
        let decision = decoder.decode(description, dec(amount), Some(payer));
        if decision.requires_review() {
            held_for_review += 1;
            continue;
        }
        let (ryan_share, jordyn_share) = decision.shares_for(payer);
        engine
            .post_expense(
                date,
                payer,
                Money::new(ryan_share),
                Money::new(jordyn_share),
                description,
                Some(decision.extracted_data.clone()),
            )
            .unwrap();
    }

    assert_eq!(held_for_review, 1);
    assert_eq!(engine.get_transaction_log().len(), 4);

    // Ryan is owed 50 + 80; he owes 26.50 (26.495 rounded half-up)
    assert_eq!(engine.ryan_receivable(), Money::new(dec("130.00")));
    assert_eq!(engine.ryan_payable(), Money::new(dec("26.50")));

    let balance = engine.get_current_balance().unwrap();
    assert_eq!(balance.status, BalanceStatus::JordynOwesRyan);
    assert_eq!(balance.amount, Money::new(dec("103.50")));
}
