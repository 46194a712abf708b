//! Keyword taxonomy for log messages.
//!
//! Classification walks an ordered rule table and the first rule whose
//! keyword appears in the lowercased message wins. Two rules may both match a
//! message; only the earlier one is reported.

use crate::record::LogRecord;
use log::info;
use serde::Serialize;
use std::fmt;

/// Category label assigned to every parsed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ProcessingMessage,
    BalanceSyncStart,
    BalanceAlreadySynced,
    BalanceSyncSkip,
    Transaction,
    SlackNotification,
    Error,
    Overdraft,
    Other,
}

impl Category {
    /// All categories in taxonomy order.
    pub const ALL: [Category; 9] = [
        Category::ProcessingMessage,
        Category::BalanceSyncStart,
        Category::BalanceAlreadySynced,
        Category::BalanceSyncSkip,
        Category::Transaction,
        Category::SlackNotification,
        Category::Error,
        Category::Overdraft,
        Category::Other,
    ];

    /// Snake-case label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ProcessingMessage => "processing_message",
            Category::BalanceSyncStart => "balance_sync_start",
            Category::BalanceAlreadySynced => "balance_already_synced",
            Category::BalanceSyncSkip => "balance_sync_skip",
            Category::Transaction => "transaction",
            Category::SlackNotification => "slack_notification",
            Category::Error => "error",
            Category::Overdraft => "overdraft",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classification rule: any of `keywords` in the lowercased message.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub keywords: &'static [&'static str],
    pub category: Category,
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Rules in priority order. Anything unmatched is `Category::Other`.
pub const RULES: &[Rule] = &[
    Rule {
        keywords: &["processing message"],
        category: Category::ProcessingMessage,
    },
    Rule {
        keywords: &["start syncing the balance"],
        category: Category::BalanceSyncStart,
    },
    Rule {
        keywords: &["balance is already synced"],
        category: Category::BalanceAlreadySynced,
    },
    Rule {
        keywords: &["skipping the balance sync"],
        category: Category::BalanceSyncSkip,
    },
    Rule {
        keywords: &["transaction {"],
        category: Category::Transaction,
    },
    Rule {
        keywords: &["sending slack notification"],
        category: Category::SlackNotification,
    },
    Rule {
        keywords: &["error", "failed"],
        category: Category::Error,
    },
    Rule {
        keywords: &["overdraft"],
        category: Category::Overdraft,
    },
];

/// Classifies a message. `None` is always `Category::Other`.
pub fn categorize(message: Option<&str>) -> Category {
    let Some(message) = message else {
        return Category::Other;
    };
    let lowered = message.to_lowercase();

    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.category)
        .unwrap_or(Category::Other)
}

/// A log record together with its category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizedRecord {
    pub record: LogRecord,
    pub category: Category,
}

/// Frequency of each category across a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: [usize; Category::ALL.len()],
}

impl CategoryCounts {
    /// Counts categories over a batch of records.
    pub fn from_records(records: &[CategorizedRecord]) -> Self {
        let mut counts = CategoryCounts::default();
        for r in records {
            counts.counts[Self::slot(r.category)] += 1;
        }
        counts
    }

    fn slot(category: Category) -> usize {
        Category::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or(Category::ALL.len() - 1)
    }

    /// Number of records with the given category.
    pub fn get(&self, category: Category) -> usize {
        self.counts[Self::slot(category)]
    }

    /// Total number of records counted.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Non-zero categories, most frequent first; ties keep taxonomy order.
    pub fn ranked(&self) -> Vec<(Category, usize)> {
        let mut ranked: Vec<(Category, usize)> = Category::ALL
            .iter()
            .map(|c| (*c, self.get(*c)))
            .filter(|(_, n)| *n > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Categorizes every record and returns the batch with its frequency counts.
pub fn categorize_records(records: Vec<LogRecord>) -> (Vec<CategorizedRecord>, CategoryCounts) {
    let categorized: Vec<CategorizedRecord> = records
        .into_iter()
        .map(|record| {
            let category = categorize(record.message.as_deref());
            CategorizedRecord { record, category }
        })
        .collect();

    let counts = CategoryCounts::from_records(&categorized);
    let total = counts.total();
    info!("Categorized {} records", total);
    for (category, count) in counts.ranked() {
        info!(
            "  {}: {} ({:.1}%)",
            category,
            count,
            count as f64 / total as f64 * 100.0
        );
    }

    (categorized, counts)
}
