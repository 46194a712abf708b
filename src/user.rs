//! Per-user rollups over the transaction table.

use crate::money::Money;
use crate::transaction::{Direction, Transaction};
use log::info;
use serde::Serialize;
use std::collections::HashMap;

/// One row of the user analysis table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub user_id: String,
    pub transaction_count: usize,
    pub credit_count: usize,
    pub debit_count: usize,
    pub total_credits: Money,
    pub total_debits: Money,
    pub min_balance: Option<Money>,
    pub max_balance: Option<Money>,
    /// Balance after the user's chronologically last transaction.
    pub current_balance: Option<Money>,
    pub first_transaction: Option<String>,
    pub last_transaction: Option<String>,
    pub overdraft_flag: bool,
}

impl UserSummary {
    /// Summarizes one user's transactions.
    ///
    /// Transactions are ordered by `datetime` with a stable sort; undated ones
    /// sort before dated ones. Returns `None` for an empty slice.
    pub fn from_transactions(user_id: &str, transactions: &[&Transaction]) -> Option<Self> {
        let mut sorted: Vec<&Transaction> = transactions.to_vec();
        // None < Some(_), so undated transactions come first
        sorted.sort_by_key(|t| t.datetime);

        let first = sorted.first()?;
        let last = sorted.last()?;

        let mut summary = UserSummary {
            user_id: user_id.to_string(),
            transaction_count: sorted.len(),
            credit_count: 0,
            debit_count: 0,
            total_credits: Money::ZERO,
            total_debits: Money::ZERO,
            min_balance: sorted.iter().filter_map(|t| t.user_balance).min(),
            max_balance: sorted.iter().filter_map(|t| t.user_balance).max(),
            current_balance: last.user_balance,
            first_transaction: first.timestamp.clone(),
            last_transaction: last.timestamp.clone(),
            overdraft_flag: false,
        };

        for tx in &sorted {
            match tx.direction() {
                Some(Direction::Credit) => {
                    summary.credit_count += 1;
                    summary.total_credits += tx.amount;
                }
                Some(Direction::Debit) => {
                    summary.debit_count += 1;
                    summary.total_debits += tx.amount;
                }
                None => {}
            }
        }
        summary.overdraft_flag = summary.min_balance.is_some_and(|m| m.is_negative());

        Some(summary)
    }
}

/// Builds one summary per distinct non-null `userId`.
///
/// Rows follow the order in which users first appear in the table.
pub fn analyze_users(transactions: &[Transaction]) -> Vec<UserSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&Transaction>> = HashMap::new();

    for tx in transactions {
        let Some(user) = tx.user_id.as_deref() else {
            continue;
        };
        groups
            .entry(user)
            .or_insert_with(|| {
                order.push(user);
                Vec::new()
            })
            .push(tx);
    }

    let summaries: Vec<UserSummary> = order
        .iter()
        .filter_map(|user| UserSummary::from_transactions(user, groups.get(user)?))
        .collect();

    if summaries.is_empty() {
        info!("No user data available for analysis");
    } else {
        let overdrawn = summaries.iter().filter(|s| s.overdraft_flag).count();
        info!("Analyzed {} users", summaries.len());
        if overdrawn > 0 {
            info!("{} users experienced overdraft", overdrawn);
        }
    }

    summaries
}
