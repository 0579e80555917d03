//! Core types and data structures for fund reconciliation

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Monetary amount in the single reporting currency
pub type Money = BigDecimal;

/// Which side of the fund/child relationship a transaction was recorded on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    /// Recorded on the fund (parent) activity: money sent to a child
    Outgoing,
    /// Recorded on a child activity: money received from the fund
    Incoming,
}

/// IATI-style transaction type codes used by activity records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Disbursement,
    Expenditure,
    IncomingFunds,
    LoanRepayment,
    InterestPayment,
}

impl TransactionType {
    /// The reconciliation direction implied by this type, if any.
    ///
    /// Repayments and interest flow back against the normal fund direction
    /// and never take part in fund reconciliation.
    pub fn direction(&self) -> Option<TransactionDirection> {
        match self {
            TransactionType::Disbursement | TransactionType::Expenditure => {
                Some(TransactionDirection::Outgoing)
            }
            TransactionType::IncomingFunds => Some(TransactionDirection::Incoming),
            TransactionType::LoanRepayment | TransactionType::InterestPayment => None,
        }
    }
}

/// A single financial transaction recorded against an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Identifier, unique within its source list
    pub id: String,
    /// Activity the transaction is recorded on
    pub activity_id: String,
    /// Counterpart activity the transaction is presumed to relate to
    pub activity_ref: String,
    pub direction: TransactionDirection,
    /// Signed amount in the reporting currency
    pub amount: Money,
    /// Value date; some source records carry none
    pub date: Option<NaiveDate>,
    pub transaction_type: Option<TransactionType>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    /// Fields carried through without interpretation
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Transaction {
    /// Create a new transaction with no optional details
    pub fn new(
        id: String,
        activity_id: String,
        activity_ref: String,
        direction: TransactionDirection,
        amount: Money,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            activity_id,
            activity_ref,
            direction,
            amount,
            date,
            transaction_type: None,
            currency: None,
            description: None,
            reference: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Whole days between the two value dates, `None` when either is missing
    pub fn days_from(&self, other: &Transaction) -> Option<i64> {
        match (self.date, other.date) {
            (Some(a), Some(b)) => Some((a - b).num_days().abs()),
            _ => None,
        }
    }
}

/// An activity as seen by reconciliation: a pooled fund or one of its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,
    /// Fund activity this one receives money from, if any
    pub parent_id: Option<String>,
}

impl Activity {
    /// Create a top-level activity
    pub fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            parent_id: None,
        }
    }

    /// Create an activity funded by `parent_id`
    pub fn child_of(id: String, title: String, parent_id: String) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(id, title)
        }
    }
}

/// Outcome of pairing a fund-side transaction with a child-side one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Amounts agree within tolerance
    Matched,
    /// Paired by reporting period, amounts disagree
    Mismatched,
}

/// One fund-side transaction paired with one child-side transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub fund_transaction: Transaction,
    pub child_transaction: Transaction,
    pub status: MatchStatus,
    /// `child.amount - fund.amount`; bounded by the tolerance for matched pairs
    pub discrepancy: Money,
}

impl MatchResult {
    /// Pair two transactions, recording the signed discrepancy
    pub fn new(
        fund_transaction: Transaction,
        child_transaction: Transaction,
        status: MatchStatus,
    ) -> Self {
        let discrepancy = &child_transaction.amount - &fund_transaction.amount;
        Self {
            fund_transaction,
            child_transaction,
            status,
            discrepancy,
        }
    }
}

/// Reconciliation of one child activity against the fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildReconciliation {
    pub child_id: String,
    pub child_title: String,
    pub matches: Vec<MatchResult>,
    pub mismatches: Vec<MatchResult>,
    pub unmatched_fund: Vec<Transaction>,
    pub unmatched_child: Vec<Transaction>,
    /// Sum of every fund-side amount, regardless of match status
    pub fund_total: Money,
    /// Sum of every child-side amount, regardless of match status
    pub child_total: Money,
    /// `child_total - fund_total`
    pub discrepancy: Money,
}

impl ChildReconciliation {
    /// True when every transaction on both sides was matched
    pub fn is_fully_reconciled(&self) -> bool {
        self.mismatches.is_empty()
            && self.unmatched_fund.is_empty()
            && self.unmatched_child.is_empty()
    }

    /// Number of fund-side transactions this result accounts for
    pub fn fund_transaction_count(&self) -> usize {
        self.matches.len() + self.mismatches.len() + self.unmatched_fund.len()
    }

    /// Number of child-side transactions this result accounts for
    pub fn child_transaction_count(&self) -> usize {
        self.matches.len() + self.mismatches.len() + self.unmatched_child.len()
    }
}

/// Rollup across every child of a fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub child_count: usize,
    pub matched_count: usize,
    pub mismatch_count: usize,
    pub unmatched_fund_count: usize,
    pub unmatched_child_count: usize,
    /// Sum of fund-side amounts over matched pairs
    pub total_matched: Money,
    pub total_discrepancy: Money,
    /// Share of classified items that matched, in `[0, 100]`
    pub percent_reconciled: f64,
}

/// Reconciliation of a pooled fund against all of its children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundReconciliation {
    pub fund_activity_id: String,
    pub children: Vec<ChildReconciliation>,
    pub summary: ReconciliationSummary,
}

/// Errors that can occur during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    #[error("Invalid amount on transaction '{transaction_id}': {value}")]
    InvalidAmount { transaction_id: String, value: String },
    #[error("Invalid date on transaction '{transaction_id}': {value}")]
    InvalidDate { transaction_id: String, value: String },
    #[error("Duplicate transaction id: {0}")]
    DuplicateTransaction(String),
    #[error("Transaction '{transaction_id}' is in {found}, expected {expected}")]
    CurrencyMismatch {
        transaction_id: String,
        expected: String,
        found: String,
    },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Activity not found: {0}")]
    ActivityNotFound(String),
    #[error("Repository error: {0}")]
    Repository(String),
    #[error("Matching strategy error: {0}")]
    Strategy(String),
}

/// Result type for reconciliation operations
pub type ReconciliationResult<T> = Result<T, ReconciliationError>;
