//! Assembly of the named output tables.

use crate::category::{Category, CategoryCounts};
use crate::overdraft::{OverdraftReport, OverdraftStats};
use crate::transaction::{Transaction, TransactionStats};
use crate::user::UserSummary;
use serde::Serialize;
use std::fmt;

/// One row of the category statistics table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStat {
    pub category: Category,
    pub count: usize,
    pub percentage: f64,
}

/// Turns frequency counts into rows with percentages of the whole batch.
pub fn category_stats(counts: &CategoryCounts) -> Vec<CategoryStat> {
    let total = counts.total();
    counts
        .ranked()
        .into_iter()
        .map(|(category, count)| CategoryStat {
            category,
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect()
}

/// Names of the exported datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportKind {
    Transactions,
    UserAnalysis,
    CategoryStats,
    Overdrafts,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Transactions,
        ReportKind::UserAnalysis,
        ReportKind::CategoryStats,
        ReportKind::Overdrafts,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::Transactions => "transactions",
            ReportKind::UserAnalysis => "user_analysis",
            ReportKind::CategoryStats => "category_stats",
            ReportKind::Overdrafts => "overdrafts",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub total_records: usize,
    pub category_stats: Vec<CategoryStat>,
    pub transactions: Vec<Transaction>,
    pub transaction_stats: TransactionStats,
    pub user_analysis: Vec<UserSummary>,
    pub overdrafts: Vec<Transaction>,
    pub overdraft_stats: OverdraftStats,
}

impl AnalysisReport {
    /// Combines the outputs of each pipeline stage.
    pub fn assemble(
        counts: &CategoryCounts,
        transactions: Vec<Transaction>,
        transaction_stats: TransactionStats,
        overdrafts: OverdraftReport,
        user_analysis: Vec<UserSummary>,
    ) -> Self {
        AnalysisReport {
            total_records: counts.total(),
            category_stats: category_stats(counts),
            transactions,
            transaction_stats,
            user_analysis,
            overdrafts: overdrafts.negative,
            overdraft_stats: overdrafts.stats,
        }
    }

    /// Number of rows in a dataset.
    pub fn row_count(&self, kind: ReportKind) -> usize {
        match kind {
            ReportKind::Transactions => self.transactions.len(),
            ReportKind::UserAnalysis => self.user_analysis.len(),
            ReportKind::CategoryStats => self.category_stats.len(),
            ReportKind::Overdrafts => self.overdrafts.len(),
        }
    }

    /// Returns `true` if the dataset has nothing to export.
    pub fn is_empty(&self, kind: ReportKind) -> bool {
        self.row_count(kind) == 0
    }
}
