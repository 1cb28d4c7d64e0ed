//! Audit trail export
//!
//! Serializes the account summary and the full entry log to a JSON document.
//! Pure I/O: no business logic, no retries. Failures propagate as
//! [`Error::Io`](crate::Error::Io).

use crate::{AccountSummary, AccountingEngine, Result, Transaction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Exported audit document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrail {
    /// When the export was produced
    pub generated_at: DateTime<Utc>,

    /// Account balances at export time
    pub summary: AccountSummary,

    /// Every entry, oldest first
    pub transactions: Vec<Transaction>,
}

impl AuditTrail {
    /// Snapshot an engine (re-validates its invariants)
    pub fn from_engine(engine: &AccountingEngine) -> Result<Self> {
        Ok(Self {
            generated_at: Utc::now(),
            summary: engine.get_account_summary()?,
            transactions: engine.get_transaction_log().to_vec(),
        })
    }

    /// Write as pretty-printed JSON, creating parent directories
    pub fn write_to(&self, destination: impl AsRef<Path>) -> Result<()> {
        let path = destination.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;

        tracing::info!(
            path = %path.display(),
            transactions = self.transactions.len(),
            "Audit trail exported"
        );

        Ok(())
    }

    /// Read an exported trail back, re-checking every entry's balance
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let trail: AuditTrail = serde_json::from_str(&content)?;

        for tx in &trail.transactions {
            tx.verify()?;
        }

        Ok(trail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Money, Party};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn sample_engine() -> AccountingEngine {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mut engine = AccountingEngine::new();
        engine
            .post_expense(date, Party::Ryan, Money::from(20), Money::from(20), "Costco", None)
            .unwrap();
        engine.post_rent(date, Money::from(2000), Decimal::new(47, 2)).unwrap();
        engine
    }

    #[test]
    fn test_export_stable_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.json");

        sample_engine().export_audit_trail(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["generated_at"].is_string());

        let summary = &value["summary"];
        for field in [
            "ryan_receivable",
            "ryan_payable",
            "jordyn_receivable",
            "jordyn_payable",
            "ryan_net",
            "jordyn_net",
            "current_balance",
            "transaction_count",
        ] {
            assert!(!summary[field].is_null(), "missing {field}");
        }
        assert_eq!(summary["transaction_count"], 2);
        assert_eq!(summary["current_balance"], "Ryan owes Jordyn $920.00");
        assert_eq!(value["transactions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.json");
        let engine = sample_engine();

        engine.export_audit_trail(&path).unwrap();
        let trail = AuditTrail::load(&path).unwrap();

        assert_eq!(trail.transactions, engine.get_transaction_log());
        assert_eq!(trail.summary, engine.get_account_summary().unwrap());
    }

    #[test]
    fn test_io_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file
        let err = sample_engine().export_audit_trail(dir.path()).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
