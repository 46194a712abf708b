//! Transaction reconstruction from `Transaction {...}` log payloads.
//!
//! Each field is pulled out of the message by its own unanchored pattern, so
//! the payload is assumed to be flat: a nested object reusing a key such as
//! `"amount"` would leak into the outer transaction. Structural JSON parsing
//! is not attempted.

use crate::category::{Category, CategorizedRecord};
use crate::money::Money;
use chrono::{DateTime, Utc};
use log::{debug, info};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::OnceLock;

/// Payload fields and the patterns that capture them.
struct FieldPatterns {
    id: Regex,
    tx_type: Regex,
    source: Regex,
    action: Regex,
    amount: Regex,
    vat: Regex,
    user_balance: Regex,
    user_id: Regex,
}

fn quoted(key: &str) -> Regex {
    Regex::new(&format!(r#""{}":"([^"]+)""#, key)).expect("valid quoted field regex")
}

fn patterns() -> &'static FieldPatterns {
    static PATTERNS: OnceLock<FieldPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| FieldPatterns {
        id: quoted("id"),
        tx_type: quoted("type"),
        source: quoted("source"),
        action: quoted("action"),
        amount: Regex::new(r#""amount":([0-9.]+)"#).expect("valid amount regex"),
        vat: Regex::new(r#""vat":([0-9.]+)"#).expect("valid vat regex"),
        user_balance: Regex::new(r#""userBalance":([0-9.-]+)"#)
            .expect("valid userBalance regex"),
        user_id: quoted("userId"),
    })
}

fn capture(re: &Regex, message: &str) -> Option<String> {
    re.captures(message)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn capture_money(re: &Regex, message: &str) -> Option<Money> {
    let raw = capture(re, message)?;
    match Money::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Ignoring unparsable numeric field '{}': {}", raw, e);
            None
        }
    }
}

/// Every field the extractor looks for, before mandatory-field filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionCandidate {
    pub id: Option<String>,
    pub tx_type: Option<String>,
    pub source: Option<String>,
    pub action: Option<String>,
    pub amount: Option<Money>,
    pub vat: Option<Money>,
    pub user_balance: Option<Money>,
    pub user_id: Option<String>,
}

impl TransactionCandidate {
    /// Applies every field pattern independently to a message body.
    pub fn from_message(message: &str) -> Self {
        let p = patterns();
        TransactionCandidate {
            id: capture(&p.id, message),
            tx_type: capture(&p.tx_type, message),
            source: capture(&p.source, message),
            action: capture(&p.action, message),
            amount: capture_money(&p.amount, message),
            vat: capture_money(&p.vat, message),
            user_balance: capture_money(&p.user_balance, message),
            user_id: capture(&p.user_id, message),
        }
    }
}

/// A transaction reconstructed from a log record.
///
/// `id` and `amount` are always present; every other payload field is
/// optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub timestamp: Option<String>,
    pub datetime: Option<DateTime<Utc>>,
    pub session_id: Option<String>,
    pub id: String,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub source: Option<String>,
    pub action: Option<String>,
    pub amount: Money,
    pub vat: Option<Money>,
    #[serde(rename = "userBalance")]
    pub user_balance: Option<Money>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// Credit/debit direction, taken from an exact `type` match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Credit,
    Debit,
}

impl Transaction {
    /// Builds a transaction from a categorized record.
    ///
    /// Returns `None` when the record is not a transaction, has no message, or
    /// the payload lacks `id` or `amount`.
    pub fn from_record(record: &CategorizedRecord) -> Option<Self> {
        if record.category != Category::Transaction {
            return None;
        }
        let message = record.record.message.as_deref()?;
        let candidate = TransactionCandidate::from_message(message);

        let (Some(id), Some(amount)) = (candidate.id, candidate.amount) else {
            debug!(
                "Dropping transaction payload without id/amount at {}",
                record.record.timestamp.as_deref().unwrap_or("<no timestamp>")
            );
            return None;
        };

        Some(Transaction {
            timestamp: record.record.timestamp.clone(),
            datetime: record.record.datetime,
            session_id: record.record.session_id.clone(),
            id,
            tx_type: candidate.tx_type,
            source: candidate.source,
            action: candidate.action,
            amount,
            vat: candidate.vat,
            user_balance: candidate.user_balance,
            user_id: candidate.user_id,
        })
    }

    /// `CREDIT` or `DEBIT`, case-sensitive; anything else is neither.
    pub fn direction(&self) -> Option<Direction> {
        match self.tx_type.as_deref() {
            Some("CREDIT") => Some(Direction::Credit),
            Some("DEBIT") => Some(Direction::Debit),
            _ => None,
        }
    }
}

/// Aggregate figures over the transaction table. All zero when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionStats {
    pub total_count: usize,
    pub credit_count: usize,
    pub debit_count: usize,
    pub total_credits: Money,
    pub total_debits: Money,
    pub unique_users: usize,
    pub unique_sessions: usize,
}

impl TransactionStats {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut stats = TransactionStats {
            total_count: transactions.len(),
            ..Default::default()
        };

        for tx in transactions {
            match tx.direction() {
                Some(Direction::Credit) => {
                    stats.credit_count += 1;
                    stats.total_credits += tx.amount;
                }
                Some(Direction::Debit) => {
                    stats.debit_count += 1;
                    stats.total_debits += tx.amount;
                }
                None => {}
            }
        }

        stats.unique_users = transactions
            .iter()
            .filter_map(|t| t.user_id.as_deref())
            .collect::<HashSet<_>>()
            .len();
        stats.unique_sessions = transactions
            .iter()
            .filter_map(|t| t.session_id.as_deref())
            .collect::<HashSet<_>>()
            .len();

        stats
    }
}

/// Extracts the transaction table from a categorized batch.
pub fn extract_transactions(records: &[CategorizedRecord]) -> (Vec<Transaction>, TransactionStats) {
    let transactions: Vec<Transaction> = records.iter().filter_map(Transaction::from_record).collect();
    let stats = TransactionStats::from_transactions(&transactions);

    if transactions.is_empty() {
        info!("No transactions found in logs");
    } else {
        info!(
            "Extracted {} transactions ({} credits, {} debits)",
            stats.total_count, stats.credit_count, stats.debit_count
        );
    }

    (transactions, stats)
}
