//! Double-entry accounting engine
//!
//! Maintains four mirrored balances between Ryan and Jordyn plus an
//! append-only log of every posted entry.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ledger_core::{AccountingEngine, BalanceStatus, Money, Party};
//! use rust_decimal::Decimal;
//!
//! # fn main() -> ledger_core::Result<()> {
//! let mut engine = AccountingEngine::new();
//! let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
//!
//! engine.post_expense(date, Party::Ryan, Money::from(50), Money::from(50), "Groceries", None)?;
//! engine.post_rent(date, Money::from(2000), Decimal::new(43, 2))?;
//! engine.post_settlement(date, Money::from(860), Party::Ryan, Party::Jordyn)?;
//!
//! let balance = engine.get_current_balance()?;
//! assert_eq!(balance.status, BalanceStatus::JordynOwesRyan);
//! assert_eq!(balance.amount, Money::from(50));
//! # Ok(())
//! # }
//! ```

use crate::{
    audit::AuditTrail,
    settlement::{plan_settlement, SettlementPlan},
    transaction::{Metadata, Postings, Transaction},
    AccountSummary, Balance, BalanceStatus, Config, Error, Money, Party, Result,
    TransactionCategory,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use uuid::Uuid;

/// Metadata keys `post_expense` fills from the posted values
const EXPENSE_KEYS: [&str; 3] = ["payer", "ryan_share", "jordyn_share"];

/// Ledger of mutual debts between the two parties
///
/// Not thread-safe: one engine belongs to one reconciliation run. Wrap it in
/// [`SharedEngine`](crate::SharedEngine) if several threads need to post.
#[derive(Debug, Clone)]
pub struct AccountingEngine {
    /// Amount Jordyn owes Ryan (Ryan's asset)
    ryan_receivable: Money,

    /// Amount Ryan owes Jordyn (Ryan's liability)
    ryan_payable: Money,

    /// Amount Ryan owes Jordyn (Jordyn's asset)
    jordyn_receivable: Money,

    /// Amount Jordyn owes Ryan (Jordyn's liability)
    jordyn_payable: Money,

    /// Append-only entry log
    transactions: Vec<Transaction>,

    /// Configuration
    config: Config,
}

impl Default for AccountingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountingEngine {
    /// Create an engine with all balances at zero and default configuration
    pub fn new() -> Self {
        Self {
            ryan_receivable: Money::ZERO,
            ryan_payable: Money::ZERO,
            jordyn_receivable: Money::ZERO,
            jordyn_payable: Money::ZERO,
            transactions: Vec::new(),
            config: Config::default(),
        }
    }

    /// Create an engine with explicit configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let engine = Self {
            config,
            ..Self::new()
        };
        engine.validate_invariants()?;

        Ok(engine)
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Record a shared expense paid in full by `payer`.
    ///
    /// The payer is owed the other party's share. Shares are rounded to cents
    /// before posting.
    pub fn post_expense(
        &mut self,
        date: NaiveDate,
        payer: Party,
        ryan_share: impl Into<Money>,
        jordyn_share: impl Into<Money>,
        description: impl Into<String>,
        metadata: Option<Metadata>,
    ) -> Result<Uuid> {
        let ryan_share = ryan_share.into();
        let jordyn_share = jordyn_share.into();

        if ryan_share.is_negative() || jordyn_share.is_negative() {
            return Err(Error::invalid(format!(
                "expense shares must not be negative (ryan {}, jordyn {})",
                ryan_share, jordyn_share
            )));
        }

        let owed = match payer {
            Party::Ryan => jordyn_share,
            Party::Jordyn => ryan_share,
        };

        let mut metadata = metadata.unwrap_or_default();
        if let Some(key) = EXPENSE_KEYS.iter().find(|key| metadata.contains_key(**key)) {
            return Err(Error::invalid(format!(
                "metadata key '{}' is recorded by the engine and cannot be supplied",
                key
            )));
        }
        metadata.insert("payer".to_string(), payer.to_string());
        metadata.insert("ryan_share".to_string(), ryan_share.to_string());
        metadata.insert("jordyn_share".to_string(), jordyn_share.to_string());

        let entry = Transaction::new(
            date,
            TransactionCategory::Expense,
            description,
            Postings::owed_to(payer, owed),
            metadata,
        )?;

        tracing::info!(
            date = %date,
            payer = %payer,
            ryan_share = %ryan_share,
            jordyn_share = %jordyn_share,
            "Posting expense: {}",
            entry.description()
        );

        self.add_debt(payer, owed);
        self.commit(entry)
    }

    /// [`post_expense`](Self::post_expense) with the payer given as free text
    pub fn post_expense_by_name(
        &mut self,
        date: NaiveDate,
        payer: &str,
        ryan_share: impl Into<Money>,
        jordyn_share: impl Into<Money>,
        description: impl Into<String>,
        metadata: Option<Metadata>,
    ) -> Result<Uuid> {
        let payer: Party = payer.parse()?;
        self.post_expense(date, payer, ryan_share, jordyn_share, description, metadata)
    }

    /// Record rent paid to the landlord by Jordyn.
    ///
    /// Ryan owes `round(total_rent * ryan_percentage)`; Jordyn's share is the
    /// remainder so the two always sum to the total.
    pub fn post_rent(
        &mut self,
        date: NaiveDate,
        total_rent: impl Into<Money>,
        ryan_percentage: Decimal,
    ) -> Result<Uuid> {
        let total_rent = total_rent.into();

        if ryan_percentage < Decimal::ZERO || ryan_percentage > Decimal::ONE {
            return Err(Error::invalid(format!(
                "ryan_percentage must be between 0 and 1, got {}",
                ryan_percentage
            )));
        }
        if total_rent.is_negative() {
            return Err(Error::invalid(format!(
                "total rent must not be negative, got {}",
                total_rent
            )));
        }

        let ryan_share = total_rent * ryan_percentage;
        let jordyn_share = total_rent - ryan_share;

        let mut metadata = Metadata::new();
        metadata.insert("total_rent".to_string(), total_rent.to_string());
        metadata.insert("ryan_percentage".to_string(), ryan_percentage.to_string());
        metadata.insert("ryan_share".to_string(), ryan_share.to_string());
        metadata.insert("jordyn_share".to_string(), jordyn_share.to_string());

        let entry = Transaction::new(
            date,
            TransactionCategory::Rent,
            format!("Rent {} (Ryan {}, Jordyn {})", date.format("%Y-%m"), ryan_share, jordyn_share),
            Postings::owed_to(Party::Jordyn, ryan_share),
            metadata,
        )?;

        tracing::info!(
            date = %date,
            total = %total_rent,
            ryan_share = %ryan_share,
            jordyn_share = %jordyn_share,
            "Posting rent"
        );

        self.add_debt(Party::Jordyn, ryan_share);
        self.commit(entry)
    }

    /// [`post_rent`](Self::post_rent) using the configured Ryan percentage
    pub fn post_rent_default(&mut self, date: NaiveDate, total_rent: impl Into<Money>) -> Result<Uuid> {
        let pct = self.config.rent.ryan_percentage;
        self.post_rent(date, total_rent, pct)
    }

    /// Record a real transfer of `amount` from `from_person` to `to_person`.
    ///
    /// Pays down what the sender owes; any excess is reversed into a debt
    /// owed back to the sender.
    pub fn post_settlement(
        &mut self,
        date: NaiveDate,
        amount: impl Into<Money>,
        from_person: Party,
        to_person: Party,
    ) -> Result<Uuid> {
        let amount = amount.into();

        if from_person == to_person {
            return Err(Error::invalid(format!(
                "settlement must be between different parties, got {} -> {}",
                from_person, to_person
            )));
        }
        if !amount.is_positive() {
            return Err(Error::invalid(format!(
                "settlement amount must be positive, got {}",
                amount
            )));
        }

        let currently_owed = self.owed_by(from_person);
        let plan = plan_settlement(amount, currently_owed);

        tracing::debug!(
            from = %from_person,
            to = %to_person,
            owed = %currently_owed,
            reduction = %plan.reduction,
            reversal = %plan.reversal,
            "Settlement plan"
        );

        let mut metadata = Metadata::new();
        metadata.insert("from".to_string(), from_person.to_string());
        metadata.insert("to".to_string(), to_person.to_string());
        metadata.insert("debt_reduction".to_string(), plan.reduction.to_string());
        metadata.insert("overpayment_reversal".to_string(), plan.reversal.to_string());

        let entry = Transaction::new(
            date,
            TransactionCategory::Settlement,
            format!("Settlement: {} paid {} ${}", from_person, to_person, amount),
            Postings::owed_to(from_person, amount),
            metadata,
        )?;

        tracing::info!(
            date = %date,
            from = %from_person,
            to = %to_person,
            amount = %amount,
            overpayment = plan.is_overpayment(),
            "Posting settlement"
        );

        self.apply_settlement(from_person, &plan);
        self.commit(entry)
    }

    /// [`post_settlement`](Self::post_settlement) with parties given as free text
    pub fn post_settlement_by_name(
        &mut self,
        date: NaiveDate,
        amount: impl Into<Money>,
        from_person: &str,
        to_person: &str,
    ) -> Result<Uuid> {
        let from: Party = from_person.parse()?;
        let to: Party = to_person.parse()?;
        self.post_settlement(date, amount, from, to)
    }

    /// Who owes whom, after re-validating the invariants
    pub fn get_current_balance(&self) -> Result<Balance> {
        self.validate_invariants()?;

        let net = self.ryan_net();
        let tolerance = self.config.tolerance.balanced;

        let balance = if net.amount().abs() < tolerance {
            Balance {
                status: BalanceStatus::Balanced,
                amount: Money::ZERO,
            }
        } else if net.is_positive() {
            Balance {
                status: BalanceStatus::JordynOwesRyan,
                amount: net,
            }
        } else {
            Balance {
                status: BalanceStatus::RyanOwesJordyn,
                amount: net.abs(),
            }
        };

        Ok(balance)
    }

    /// Every posted entry, oldest first
    pub fn get_transaction_log(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Entries of one category, oldest first
    pub fn transactions_by_category(
        &self,
        category: TransactionCategory,
    ) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions
            .iter()
            .filter(move |tx| tx.category() == category)
    }

    /// Snapshot of all four accounts, both net positions and the balance
    pub fn get_account_summary(&self) -> Result<AccountSummary> {
        let balance = self.get_current_balance()?;

        Ok(AccountSummary {
            ryan_receivable: self.ryan_receivable,
            ryan_payable: self.ryan_payable,
            jordyn_receivable: self.jordyn_receivable,
            jordyn_payable: self.jordyn_payable,
            ryan_net: self.ryan_net(),
            jordyn_net: self.jordyn_net(),
            current_balance: balance.to_string(),
            transaction_count: self.transactions.len(),
        })
    }

    /// Write summary and full log as JSON to `destination`
    pub fn export_audit_trail(&self, destination: impl AsRef<Path>) -> Result<()> {
        let trail = AuditTrail::from_engine(self)?;
        trail.write_to(destination)
    }

    /// Export to the configured `audit.output_path`
    pub fn export_audit_trail_default(&self) -> Result<()> {
        self.export_audit_trail(&self.config.audit.output_path)
    }

    /// Check the three double-entry invariants.
    ///
    /// 1. `ryan_net + jordyn_net == 0`
    /// 2. `ryan_receivable == jordyn_payable`
    /// 3. `ryan_payable == jordyn_receivable`
    pub fn validate_invariants(&self) -> Result<()> {
        let tolerance = self.config.tolerance.invariant;

        let net_total = self.ryan_net() + self.jordyn_net();
        Self::check(
            "ryan_net + jordyn_net == 0",
            net_total,
            Money::ZERO,
            tolerance,
        )?;
        Self::check(
            "ryan_receivable == jordyn_payable",
            self.ryan_receivable,
            self.jordyn_payable,
            tolerance,
        )?;
        Self::check(
            "ryan_payable == jordyn_receivable",
            self.ryan_payable,
            self.jordyn_receivable,
            tolerance,
        )?;

        tracing::trace!("Invariants hold");
        Ok(())
    }

    /// Amount Jordyn owes Ryan
    pub fn ryan_receivable(&self) -> Money {
        self.ryan_receivable
    }

    /// Amount Ryan owes Jordyn
    pub fn ryan_payable(&self) -> Money {
        self.ryan_payable
    }

    /// Amount Ryan owes Jordyn, from Jordyn's side
    pub fn jordyn_receivable(&self) -> Money {
        self.jordyn_receivable
    }

    /// Amount Jordyn owes Ryan, from Jordyn's side
    pub fn jordyn_payable(&self) -> Money {
        self.jordyn_payable
    }

    /// Ryan's receivable minus payable
    pub fn ryan_net(&self) -> Money {
        self.ryan_receivable - self.ryan_payable
    }

    /// Jordyn's receivable minus payable
    pub fn jordyn_net(&self) -> Money {
        self.jordyn_receivable - self.jordyn_payable
    }

    fn check(invariant: &'static str, left: Money, right: Money, tolerance: Decimal) -> Result<()> {
        if left.approx_eq(right, tolerance) {
            return Ok(());
        }

        tracing::error!(
            invariant,
            left = %left,
            right = %right,
            "Ledger invariant violated"
        );

        Err(Error::InvariantViolation {
            invariant,
            left: left.amount(),
            right: right.amount(),
        })
    }

    /// What `debtor` currently owes the other party
    fn owed_by(&self, debtor: Party) -> Money {
        match debtor {
            Party::Ryan => self.ryan_payable,
            Party::Jordyn => self.jordyn_payable,
        }
    }

    /// `creditor` is owed `amount` more by the other party
    fn add_debt(&mut self, creditor: Party, amount: Money) {
        match creditor {
            Party::Ryan => {
                self.ryan_receivable += amount;
                self.jordyn_payable += amount;
            }
            Party::Jordyn => {
                self.ryan_payable += amount;
                self.jordyn_receivable += amount;
            }
        }
    }

    /// `debtor` owes `amount` less to the other party
    fn reduce_debt(&mut self, debtor: Party, amount: Money) {
        match debtor {
            Party::Ryan => {
                self.ryan_payable -= amount;
                self.jordyn_receivable -= amount;
            }
            Party::Jordyn => {
                self.jordyn_payable -= amount;
                self.ryan_receivable -= amount;
            }
        }
    }

    fn apply_settlement(&mut self, sender: Party, plan: &SettlementPlan) {
        self.reduce_debt(sender, plan.reduction);
        if plan.is_overpayment() {
            self.add_debt(sender, plan.reversal);
        }
    }

    /// Append the entry and re-check invariants
    fn commit(&mut self, entry: Transaction) -> Result<Uuid> {
        let id = entry.id();
        self.transactions.push(entry);
        self.validate_invariants()?;
        Ok(id)
    }
}
