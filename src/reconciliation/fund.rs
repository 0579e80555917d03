//! Fund-level orchestration: fetch each child's transactions and reconcile

use tracing::instrument;

use crate::config::ReconciliationConfig;
use crate::reconciliation::engine::ReconciliationEngine;
use crate::traits::*;
use crate::types::*;

/// Reconciles a pooled fund against every child activity it funds
pub struct FundReconciler<R: TransactionRepository> {
    repository: R,
    engine: ReconciliationEngine,
}

impl<R: TransactionRepository> FundReconciler<R> {
    /// Create a reconciler with greedy matching
    pub fn new(repository: R, config: ReconciliationConfig) -> ReconciliationResult<Self> {
        Ok(Self::with_engine(repository, ReconciliationEngine::new(config)?))
    }

    /// Create a reconciler around a preconfigured engine
    pub fn with_engine(repository: R, engine: ReconciliationEngine) -> Self {
        Self { repository, engine }
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Reconcile every child of `fund_activity_id` and summarize.
    ///
    /// Children are processed in the order the repository lists them; any
    /// error aborts the run rather than returning a partial report.
    #[instrument(skip(self))]
    pub async fn reconcile_fund(
        &self,
        fund_activity_id: &str,
    ) -> ReconciliationResult<FundReconciliation> {
        let fund = self.require_activity(fund_activity_id).await?;
        let children = self
            .repository
            .list_child_activities(&fund.id)
            .await?;
        let fund_outgoing = self
            .repository
            .get_transactions(&fund.id, Some(TransactionDirection::Outgoing))
            .await?;

        let orphaned = fund_outgoing
            .iter()
            .filter(|t| !children.iter().any(|c| c.id == t.activity_ref))
            .count();
        if orphaned > 0 {
            tracing::warn!(
                orphaned,
                "fund transactions reference activities that are not children of the fund"
            );
        }

        let mut reconciliations = Vec::with_capacity(children.len());
        for child in &children {
            reconciliations.push(self.reconcile_against(&fund, &fund_outgoing, child).await?);
        }

        let summary = self.engine.summarize(&reconciliations);
        tracing::info!(
            fund = %fund.id,
            children = summary.child_count,
            matched = summary.matched_count,
            mismatched = summary.mismatch_count,
            percent_reconciled = summary.percent_reconciled,
            "fund reconciled"
        );

        Ok(FundReconciliation {
            fund_activity_id: fund.id,
            children: reconciliations,
            summary,
        })
    }

    /// Reconcile a single child of the fund
    #[instrument(skip(self))]
    pub async fn reconcile_child(
        &self,
        fund_activity_id: &str,
        child_activity_id: &str,
    ) -> ReconciliationResult<ChildReconciliation> {
        let fund = self.require_activity(fund_activity_id).await?;
        let child = self
            .repository
            .list_child_activities(&fund.id)
            .await?
            .into_iter()
            .find(|c| c.id == child_activity_id)
            .ok_or_else(|| ReconciliationError::ActivityNotFound(child_activity_id.to_string()))?;
        let fund_outgoing = self
            .repository
            .get_transactions(&fund.id, Some(TransactionDirection::Outgoing))
            .await?;

        self.reconcile_against(&fund, &fund_outgoing, &child).await
    }

    async fn require_activity(&self, activity_id: &str) -> ReconciliationResult<Activity> {
        self.repository
            .get_activity(activity_id)
            .await?
            .ok_or_else(|| ReconciliationError::ActivityNotFound(activity_id.to_string()))
    }

    async fn reconcile_against(
        &self,
        fund: &Activity,
        fund_outgoing: &[Transaction],
        child: &Activity,
    ) -> ReconciliationResult<ChildReconciliation> {
        let fund_side: Vec<Transaction> = fund_outgoing
            .iter()
            .filter(|t| t.activity_ref == child.id)
            .cloned()
            .collect();
        let child_side: Vec<Transaction> = self
            .repository
            .get_transactions(&child.id, Some(TransactionDirection::Incoming))
            .await?
            .into_iter()
            .filter(|t| t.activity_ref == fund.id)
            .collect();

        self.engine.reconcile(child, &fund_side, &child_side)
    }
}
