//! JSON report served to the presentation layer

use serde::{Deserialize, Serialize};

use crate::activity::record::{money_to_f64, TransactionRecord};
use crate::types::*;

/// `{ children, summary }` response body for a fund reconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundReconciliationReport {
    pub children: Vec<ChildReport>,
    pub summary: SummaryReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildReport {
    pub child_id: String,
    pub child_title: String,
    pub matches: Vec<MatchReport>,
    pub unmatched_fund: Vec<TransactionRecord>,
    pub unmatched_child: Vec<TransactionRecord>,
    pub mismatches: Vec<MatchReport>,
    pub fund_total: f64,
    pub child_total: f64,
    pub discrepancy: f64,
}

/// A pair; `discrepancy` is only present on mismatches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub fund_transaction: TransactionRecord,
    pub child_transaction: TransactionRecord,
    pub status: MatchStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrepancy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total_matched: f64,
    pub total_discrepancy: f64,
    pub percent_reconciled: f64,
    pub matched_count: usize,
    pub unmatched_fund_count: usize,
    pub unmatched_child_count: usize,
    pub mismatch_count: usize,
    pub child_count: usize,
}

impl FundReconciliationReport {
    /// Pretty-printed JSON body
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&FundReconciliation> for FundReconciliationReport {
    fn from(reconciliation: &FundReconciliation) -> Self {
        Self {
            children: reconciliation.children.iter().map(ChildReport::from).collect(),
            summary: SummaryReport::from(&reconciliation.summary),
        }
    }
}

impl From<&ChildReconciliation> for ChildReport {
    fn from(child: &ChildReconciliation) -> Self {
        Self {
            child_id: child.child_id.clone(),
            child_title: child.child_title.clone(),
            matches: child.matches.iter().map(MatchReport::from).collect(),
            unmatched_fund: child.unmatched_fund.iter().map(TransactionRecord::from).collect(),
            unmatched_child: child
                .unmatched_child
                .iter()
                .map(TransactionRecord::from)
                .collect(),
            mismatches: child.mismatches.iter().map(MatchReport::from).collect(),
            fund_total: money_to_f64(&child.fund_total),
            child_total: money_to_f64(&child.child_total),
            discrepancy: money_to_f64(&child.discrepancy),
        }
    }
}

impl From<&MatchResult> for MatchReport {
    fn from(result: &MatchResult) -> Self {
        Self {
            fund_transaction: TransactionRecord::from(&result.fund_transaction),
            child_transaction: TransactionRecord::from(&result.child_transaction),
            status: result.status,
            discrepancy: match result.status {
                MatchStatus::Matched => None,
                MatchStatus::Mismatched => Some(money_to_f64(&result.discrepancy)),
            },
        }
    }
}

impl From<&ReconciliationSummary> for SummaryReport {
    fn from(summary: &ReconciliationSummary) -> Self {
        Self {
            total_matched: money_to_f64(&summary.total_matched),
            total_discrepancy: money_to_f64(&summary.total_discrepancy),
            percent_reconciled: summary.percent_reconciled,
            matched_count: summary.matched_count,
            unmatched_fund_count: summary.unmatched_fund_count,
            unmatched_child_count: summary.unmatched_child_count,
            mismatch_count: summary.mismatch_count,
            child_count: summary.child_count,
        }
    }
}
