//! Greedy amount-then-date matching

use std::cmp::Ordering;

use crate::config::ReconciliationConfig;
use crate::traits::{IndexPair, MatchingStrategy};
use crate::types::*;

/// Ranking key for a child-side candidate; smaller is better.
///
/// Undated children rank after every dated one. Distance is unknown (and
/// ranks last among dated children) when the fund transaction has no date.
/// Input position settles anything left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct DateRank {
    undated: bool,
    distance: i64,
    index: usize,
}

impl DateRank {
    fn new(fund: &Transaction, child: &Transaction, index: usize) -> Self {
        Self {
            undated: child.date.is_none(),
            distance: fund.days_from(child).unwrap_or(i64::MAX),
            index,
        }
    }
}

/// Greedy bipartite matching.
///
/// Fund transactions are visited in input order. The exact pass pairs each
/// one with the unconsumed child transaction whose amount agrees within the
/// tolerance and whose date is closest. The mismatch pass then pairs what is
/// left with the closest-amount child dated in the same reporting period.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyMatcher;

impl GreedyMatcher {
    pub fn new() -> Self {
        Self
    }

    fn exact_pass(
        fund: &[Transaction],
        child: &[Transaction],
        config: &ReconciliationConfig,
        fund_used: &mut [bool],
        child_used: &mut [bool],
        pairs: &mut Vec<IndexPair>,
    ) {
        for (fi, fund_txn) in fund.iter().enumerate() {
            if fund_used[fi] {
                continue;
            }

            let best = child
                .iter()
                .enumerate()
                .filter(|(ci, child_txn)| {
                    !child_used[*ci] && config.within_tolerance(&child_txn.amount, &fund_txn.amount)
                })
                .map(|(ci, child_txn)| DateRank::new(fund_txn, child_txn, ci))
                .min();

            if let Some(rank) = best {
                fund_used[fi] = true;
                child_used[rank.index] = true;
                pairs.push(IndexPair {
                    fund_index: fi,
                    child_index: rank.index,
                    status: MatchStatus::Matched,
                });
            }
        }
    }

    fn mismatch_pass(
        fund: &[Transaction],
        child: &[Transaction],
        config: &ReconciliationConfig,
        fund_used: &mut [bool],
        child_used: &mut [bool],
        pairs: &mut Vec<IndexPair>,
    ) {
        let window = config.mismatch_window;

        for (fi, fund_txn) in fund.iter().enumerate() {
            if fund_used[fi] {
                continue;
            }
            let Some(fund_date) = fund_txn.date else {
                continue;
            };

            let best = child
                .iter()
                .enumerate()
                .filter(|(ci, _)| !child_used[*ci])
                .filter(|(_, child_txn)| {
                    child_txn
                        .date
                        .is_some_and(|child_date| window.contains(fund_date, child_date))
                })
                .min_by(|(ai, a), (bi, b)| {
                    let gap_a = (&a.amount - &fund_txn.amount).abs();
                    let gap_b = (&b.amount - &fund_txn.amount).abs();
                    gap_a.cmp(&gap_b).then_with(|| {
                        DateRank::new(fund_txn, a, *ai).cmp(&DateRank::new(fund_txn, b, *bi))
                    })
                })
                .map(|(ci, _)| ci);

            if let Some(ci) = best {
                fund_used[fi] = true;
                child_used[ci] = true;
                pairs.push(IndexPair {
                    fund_index: fi,
                    child_index: ci,
                    status: MatchStatus::Mismatched,
                });
            }
        }
    }
}

impl MatchingStrategy for GreedyMatcher {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn pair(
        &self,
        fund: &[Transaction],
        child: &[Transaction],
        config: &ReconciliationConfig,
    ) -> Vec<IndexPair> {
        let mut fund_used = vec![false; fund.len()];
        let mut child_used = vec![false; child.len()];
        let mut pairs = Vec::new();

        Self::exact_pass(
            fund,
            child,
            config,
            &mut fund_used,
            &mut child_used,
            &mut pairs,
        );
        let exact = pairs.len();
        tracing::debug!(matched = exact, "exact pass complete");

        if config.mismatch_window.is_enabled() {
            Self::mismatch_pass(
                fund,
                child,
                config,
                &mut fund_used,
                &mut child_used,
                &mut pairs,
            );
            tracing::debug!(mismatched = pairs.len() - exact, "mismatch pass complete");
        }

        pairs
    }
}

/// Order pairs by fund position, then child position
pub(crate) fn by_position(a: &IndexPair, b: &IndexPair) -> Ordering {
    a.fund_index
        .cmp(&b.fund_index)
        .then(a.child_index.cmp(&b.child_index))
}
