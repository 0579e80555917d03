//! Rollup of per-child reconciliations

use bigdecimal::BigDecimal;

use crate::types::*;

/// Sum counts and discrepancies across children.
///
/// `percent_reconciled` is the matched share of all classified items
/// (pairs plus unmatched transactions on either side), 0 when there are none.
pub fn summarize(reconciliations: &[ChildReconciliation]) -> ReconciliationSummary {
    let matched_count: usize = reconciliations.iter().map(|r| r.matches.len()).sum();
    let mismatch_count: usize = reconciliations.iter().map(|r| r.mismatches.len()).sum();
    let unmatched_fund_count: usize =
        reconciliations.iter().map(|r| r.unmatched_fund.len()).sum();
    let unmatched_child_count: usize =
        reconciliations.iter().map(|r| r.unmatched_child.len()).sum();

    let total_matched: BigDecimal = reconciliations
        .iter()
        .flat_map(|r| r.matches.iter())
        .map(|m| &m.fund_transaction.amount)
        .sum();
    let total_discrepancy: BigDecimal = reconciliations.iter().map(|r| &r.discrepancy).sum();

    let classified = matched_count + mismatch_count + unmatched_fund_count + unmatched_child_count;
    let percent_reconciled = if classified == 0 {
        0.0
    } else {
        matched_count as f64 / classified as f64 * 100.0
    };

    ReconciliationSummary {
        child_count: reconciliations.len(),
        matched_count,
        mismatch_count,
        unmatched_fund_count,
        unmatched_child_count,
        total_matched,
        total_discrepancy,
        percent_reconciled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(id: &str, amount: i64) -> Transaction {
        Transaction::new(
            id.to_string(),
            "fund".to_string(),
            "child".to_string(),
            TransactionDirection::Outgoing,
            BigDecimal::from(amount),
            None,
        )
    }

    fn child(
        id: &str,
        matched: usize,
        unmatched_fund: usize,
        discrepancy: i64,
    ) -> ChildReconciliation {
        let matches = (0..matched)
            .map(|i| {
                MatchResult::new(
                    transaction(&format!("f{i}"), 10),
                    transaction(&format!("c{i}"), 10),
                    MatchStatus::Matched,
                )
            })
            .collect();
        ChildReconciliation {
            child_id: id.to_string(),
            child_title: id.to_uppercase(),
            matches,
            mismatches: Vec::new(),
            unmatched_fund: (0..unmatched_fund)
                .map(|i| transaction(&format!("u{i}"), 5))
                .collect(),
            unmatched_child: Vec::new(),
            fund_total: BigDecimal::from(0),
            child_total: BigDecimal::from(0),
            discrepancy: BigDecimal::from(discrepancy),
        }
    }

    #[test]
    fn test_summarize_empty() {
        let summary = summarize(&[]);
        assert_eq!(summary.child_count, 0);
        assert_eq!(summary.matched_count, 0);
        assert_eq!(summary.percent_reconciled, 0.0);
        assert_eq!(summary.total_discrepancy, BigDecimal::from(0));
    }

    #[test]
    fn test_summarize_children_without_transactions() {
        let summary = summarize(&[child("a", 0, 0, 0), child("b", 0, 0, 0)]);
        assert_eq!(summary.child_count, 2);
        assert_eq!(summary.percent_reconciled, 0.0);
    }

    #[test]
    fn test_summarize_totals() {
        let summary = summarize(&[child("a", 3, 1, -5), child("b", 0, 0, 12)]);

        assert_eq!(summary.child_count, 2);
        assert_eq!(summary.matched_count, 3);
        assert_eq!(summary.unmatched_fund_count, 1);
        assert_eq!(summary.total_matched, BigDecimal::from(30));
        assert_eq!(summary.total_discrepancy, BigDecimal::from(7));
        assert_eq!(summary.percent_reconciled, 75.0);
    }

    #[test]
    fn test_fully_matched_is_one_hundred_percent() {
        let summary = summarize(&[child("a", 4, 0, 0)]);
        assert_eq!(summary.percent_reconciled, 100.0);
    }
}
