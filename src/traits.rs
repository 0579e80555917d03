//! Traits for data access, matching strategies and validation

use async_trait::async_trait;

use crate::config::ReconciliationConfig;
use crate::types::*;
use crate::utils::validation::{validate_currency, validate_transaction_id, validate_unique_ids};

/// Source of activities and their transactions
///
/// Reconciliation never writes; implementations only need to serve
/// consistent snapshots (a database, an HTTP API, in-memory fixtures).
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Get an activity by ID
    async fn get_activity(&self, activity_id: &str) -> ReconciliationResult<Option<Activity>>;

    /// List the activities funded by `fund_activity_id`
    async fn list_child_activities(
        &self,
        fund_activity_id: &str,
    ) -> ReconciliationResult<Vec<Activity>>;

    /// List transactions recorded on an activity, optionally filtered by direction.
    ///
    /// Order is significant: it breaks ties during matching.
    async fn get_transactions(
        &self,
        activity_id: &str,
        direction: Option<TransactionDirection>,
    ) -> ReconciliationResult<Vec<Transaction>>;
}

/// A pairing decided by a matching strategy, by position in the input lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexPair {
    pub fund_index: usize,
    pub child_index: usize,
    pub status: MatchStatus,
}

/// Pairs fund-side transactions with child-side transactions.
///
/// A strategy only decides pairings. Transactions left out of every pair are
/// reported as unmatched by the engine, so no strategy can lose one.
pub trait MatchingStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Decide pairings; each index may appear in at most one pair
    fn pair(
        &self,
        fund: &[Transaction],
        child: &[Transaction],
        config: &ReconciliationConfig,
    ) -> Vec<IndexPair>;
}

/// Trait for implementing custom transaction validation rules
pub trait TransactionValidator: Send + Sync {
    /// Validate one side's transactions before matching
    fn validate_transactions(
        &self,
        transactions: &[Transaction],
        config: &ReconciliationConfig,
    ) -> ReconciliationResult<()>;
}

/// Default validator: ids present and unique, currency consistent
pub struct DefaultTransactionValidator;

impl TransactionValidator for DefaultTransactionValidator {
    fn validate_transactions(
        &self,
        transactions: &[Transaction],
        config: &ReconciliationConfig,
    ) -> ReconciliationResult<()> {
        for transaction in transactions {
            validate_transaction_id(&transaction.id)?;
            validate_currency(transaction, config)?;
        }
        validate_unique_ids(transactions)
    }
}
