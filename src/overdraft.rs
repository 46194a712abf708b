//! Negative and low balance detection.
//!
//! Transactions without a `userBalance` belong to neither band.

use crate::money::Money;
use crate::transaction::Transaction;
use log::info;
use serde::Serialize;
use std::collections::HashSet;

/// Balances at or above zero but below this many units are "low".
pub const LOW_BALANCE_THRESHOLD: i64 = 10;

/// Balance band of a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceBand {
    Negative,
    Low,
    Healthy,
}

impl BalanceBand {
    /// Classifies a post-transaction balance.
    pub fn of(balance: Money) -> Self {
        if balance.is_negative() {
            BalanceBand::Negative
        } else if balance < Money::from_units(LOW_BALANCE_THRESHOLD) {
            BalanceBand::Low
        } else {
            BalanceBand::Healthy
        }
    }
}

fn band(tx: &Transaction) -> Option<BalanceBand> {
    tx.user_balance.map(BalanceBand::of)
}

/// Risk counters derived alongside the overdraft table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverdraftStats {
    pub negative_balance_count: usize,
    pub low_balance_count: usize,
    pub at_risk_users: usize,
}

/// Negative-balance transactions plus the low-balance band used for stats.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverdraftReport {
    /// Transactions with `userBalance < 0`; exported as the overdraft table.
    pub negative: Vec<Transaction>,
    /// Transactions with `0 <= userBalance < 10`; not exported.
    pub low: Vec<Transaction>,
    pub stats: OverdraftStats,
}

/// Partitions the transaction table into negative and low balance bands.
pub fn detect_overdrafts(transactions: &[Transaction]) -> OverdraftReport {
    if !transactions.iter().any(|t| t.user_balance.is_some()) {
        info!("Cannot detect overdrafts - no balance data in transactions");
        return OverdraftReport::default();
    }

    let in_band = |wanted: BalanceBand| -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|t| band(t) == Some(wanted))
            .cloned()
            .collect()
    };
    let negative = in_band(BalanceBand::Negative);
    let low = in_band(BalanceBand::Low);

    let at_risk_users = low
        .iter()
        .filter_map(|t| t.user_id.as_deref())
        .collect::<HashSet<_>>()
        .len();

    let stats = OverdraftStats {
        negative_balance_count: negative.len(),
        low_balance_count: low.len(),
        at_risk_users,
    };

    if negative.is_empty() {
        info!("No negative balances detected");
    } else {
        info!("Found {} transactions with negative balance", negative.len());
    }
    if !low.is_empty() {
        info!(
            "Found {} transactions with low balance (<{}) across {} users",
            low.len(),
            LOW_BALANCE_THRESHOLD,
            at_risk_users
        );
    }

    OverdraftReport {
        negative,
        low,
        stats,
    }
}
