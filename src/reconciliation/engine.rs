//! Reconciliation engine: validation, matching and per-child rollup

use bigdecimal::BigDecimal;
use tracing::instrument;

use crate::activity::TransactionRecord;
use crate::config::ReconciliationConfig;
use crate::reconciliation::matcher::{by_position, GreedyMatcher};
use crate::reconciliation::summary;
use crate::traits::*;
use crate::types::*;

/// Reconciles fund-side against child-side transactions for one child activity
pub struct ReconciliationEngine {
    config: ReconciliationConfig,
    strategy: Box<dyn MatchingStrategy>,
    validator: Box<dyn TransactionValidator>,
}

impl ReconciliationEngine {
    /// Create an engine using greedy matching
    pub fn new(config: ReconciliationConfig) -> ReconciliationResult<Self> {
        Self::with_strategy(config, Box::new(GreedyMatcher))
    }

    /// Create an engine with a custom matching strategy
    pub fn with_strategy(
        config: ReconciliationConfig,
        strategy: Box<dyn MatchingStrategy>,
    ) -> ReconciliationResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            strategy,
            validator: Box::new(DefaultTransactionValidator),
        })
    }

    /// Replace the transaction validator
    pub fn with_validator(mut self, validator: Box<dyn TransactionValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Reconcile one child activity.
    ///
    /// `fund_transactions` are the fund's outgoing transactions referencing
    /// the child; `child_transactions` are the child's incoming transactions
    /// referencing the fund. Every input transaction lands in exactly one
    /// bucket of the result. Invalid input fails the whole call.
    #[instrument(skip_all, fields(child_id = %child.id, strategy = self.strategy.name()))]
    pub fn reconcile(
        &self,
        child: &Activity,
        fund_transactions: &[Transaction],
        child_transactions: &[Transaction],
    ) -> ReconciliationResult<ChildReconciliation> {
        self.validator
            .validate_transactions(fund_transactions, &self.config)?;
        self.validator
            .validate_transactions(child_transactions, &self.config)?;

        let mut pairs = self
            .strategy
            .pair(fund_transactions, child_transactions, &self.config);
        pairs.sort_by(by_position);

        let mut fund_used = vec![false; fund_transactions.len()];
        let mut child_used = vec![false; child_transactions.len()];
        let mut matches = Vec::new();
        let mut mismatches = Vec::new();

        for pair in &pairs {
            let (Some(fund_txn), Some(child_txn)) = (
                fund_transactions.get(pair.fund_index),
                child_transactions.get(pair.child_index),
            ) else {
                return Err(ReconciliationError::Strategy(format!(
                    "{} paired out-of-range positions ({}, {})",
                    self.strategy.name(),
                    pair.fund_index,
                    pair.child_index
                )));
            };

            if fund_used[pair.fund_index] || child_used[pair.child_index] {
                return Err(ReconciliationError::Strategy(format!(
                    "{} paired a transaction twice ('{}' / '{}')",
                    self.strategy.name(),
                    fund_txn.id,
                    child_txn.id
                )));
            }
            fund_used[pair.fund_index] = true;
            child_used[pair.child_index] = true;

            let result = MatchResult::new(fund_txn.clone(), child_txn.clone(), pair.status);
            match pair.status {
                MatchStatus::Matched => {
                    if !self
                        .config
                        .within_tolerance(&child_txn.amount, &fund_txn.amount)
                    {
                        return Err(ReconciliationError::Strategy(format!(
                            "{} matched '{}' with '{}' outside tolerance",
                            self.strategy.name(),
                            fund_txn.id,
                            child_txn.id
                        )));
                    }
                    matches.push(result);
                }
                MatchStatus::Mismatched => mismatches.push(result),
            }
        }

        let unmatched_fund = unused(fund_transactions, &fund_used);
        let unmatched_child = unused(child_transactions, &child_used);

        let fund_total: BigDecimal = fund_transactions.iter().map(|t| &t.amount).sum();
        let child_total: BigDecimal = child_transactions.iter().map(|t| &t.amount).sum();
        let discrepancy = &child_total - &fund_total;

        tracing::debug!(
            matched = matches.len(),
            mismatched = mismatches.len(),
            unmatched_fund = unmatched_fund.len(),
            unmatched_child = unmatched_child.len(),
            %discrepancy,
            "child reconciled"
        );

        Ok(ChildReconciliation {
            child_id: child.id.clone(),
            child_title: child.title.clone(),
            matches,
            mismatches,
            unmatched_fund,
            unmatched_child,
            fund_total,
            child_total,
            discrepancy,
        })
    }

    /// Validate wire records and reconcile them.
    ///
    /// Records are converted in order; the first malformed amount or date
    /// aborts the call before any matching happens.
    pub fn reconcile_records(
        &self,
        child: &Activity,
        fund_activity_id: &str,
        fund_records: &[TransactionRecord],
        child_records: &[TransactionRecord],
    ) -> ReconciliationResult<ChildReconciliation> {
        let fund_transactions = fund_records
            .iter()
            .enumerate()
            .map(|(position, r)| {
                r.to_transaction(
                    position,
                    fund_activity_id,
                    &child.id,
                    TransactionDirection::Outgoing,
                )
            })
            .collect::<ReconciliationResult<Vec<_>>>()?;
        let child_transactions = child_records
            .iter()
            .enumerate()
            .map(|(position, r)| {
                r.to_transaction(
                    position,
                    &child.id,
                    fund_activity_id,
                    TransactionDirection::Incoming,
                )
            })
            .collect::<ReconciliationResult<Vec<_>>>()?;

        self.reconcile(child, &fund_transactions, &child_transactions)
    }

    /// Roll up per-child results
    pub fn summarize(&self, reconciliations: &[ChildReconciliation]) -> ReconciliationSummary {
        summary::summarize(reconciliations)
    }
}

fn unused(transactions: &[Transaction], used: &[bool]) -> Vec<Transaction> {
    transactions
        .iter()
        .zip(used)
        .filter(|(_, used)| !**used)
        .map(|(t, _)| t.clone())
        .collect()
}
