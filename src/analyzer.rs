//! Batch analysis pipeline.
//!
//! Runs the stages strictly in order, each consuming the complete output of
//! the previous one:
//!
//! raw lines → records → categorized records → transactions →
//! {overdrafts, user summaries, category stats}

use crate::category::categorize_records;
use crate::error::Result;
use crate::filter::filter_info_lines;
use crate::loader::load_info_lines;
use crate::overdraft::detect_overdrafts;
use crate::record::parse_records;
use crate::report::AnalysisReport;
use crate::transaction::extract_transactions;
use crate::user::analyze_users;
use log::info;
use std::path::Path;

/// Entry point for one analysis run.
///
/// Holds no state between runs; every call builds its tables from scratch.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAnalyzer;

impl LogAnalyzer {
    pub fn new() -> Self {
        LogAnalyzer
    }

    /// Analyzes an in-memory batch of raw lines.
    ///
    /// Lines without the informational marker are ignored. Fails only when a
    /// well-formed-looking timestamp cannot be converted.
    pub fn analyze_lines<I, S>(&self, lines: I) -> Result<AnalysisReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = filter_info_lines(lines);

        info!("Parsing {} log entries", lines.len());
        let records = parse_records(&lines)?;
        info!("Parsed {} records", records.len());

        let (categorized, counts) = categorize_records(records);
        let (transactions, transaction_stats) = extract_transactions(&categorized);
        let overdrafts = detect_overdrafts(&transactions);
        let users = analyze_users(&transactions);

        Ok(AnalysisReport::assemble(
            &counts,
            transactions,
            transaction_stats,
            overdrafts,
            users,
        ))
    }

    /// Loads every archive under `path` and analyzes its lines.
    pub fn analyze_path(&self, path: &Path) -> Result<AnalysisReport> {
        let lines = load_info_lines(path)?;
        self.analyze_lines(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::error::AnalyzerError;
    use crate::money::Money;
    use std::str::FromStr;

    #[test]
    fn test_non_info_lines_never_reach_the_parser() {
        let report = LogAnalyzer::new()
            .analyze_lines([
                "2024-01-01T10:00:00.1Z\ts\tDEBUG\tTransaction {\"id\":\"a\",\"amount\":1}",
                "2024-99-01T10:00:00.1Z\ts\tWARN\tbad timestamp but filtered out",
                "2024-01-01T10:00:00.2Z\ts\tINFO\tTransaction {\"id\":\"b\",\"amount\":2}",
            ])
            .unwrap();
        assert_eq!(report.total_records, 1);
        assert_eq!(report.transactions.len(), 1);
        assert_eq!(report.transactions[0].id, "b");
    }

    #[test]
    fn test_bad_timestamp_halts_the_run() {
        let err = LogAnalyzer::new()
            .analyze_lines(["2024-01-01T25:00:00.1Z\ts\tINFO\tProcessing message"])
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_full_pipeline() {
        let report = LogAnalyzer::new()
            .analyze_lines([
                "2024-01-01T10:00:00.1Z\ts1\tINFO\tProcessing message",
                "2024-01-01T10:00:00.2Z\ts1\tINFO\tTransaction {\"id\":\"1\",\"type\":\"CREDIT\",\"amount\":20,\"userBalance\":20,\"userId\":\"a\"}",
                "2024-01-01T10:00:00.3Z\ts1\tINFO\tTransaction {\"id\":\"2\",\"type\":\"DEBIT\",\"amount\":15,\"userBalance\":5,\"userId\":\"a\"}",
                "2024-01-01T10:00:00.4Z\ts2\tINFO\tTransaction {\"id\":\"3\",\"type\":\"DEBIT\",\"amount\":8,\"userBalance\":-8,\"userId\":\"b\"}",
                "2024-01-01T10:00:00.5Z\ts2\tINFO\tTransaction {\"type\":\"DEBIT\",\"amount\":8}",
                "2024-01-01T10:00:00.6Z\ts2\tINFO\tSending slack notification",
            ])
            .unwrap();

        assert_eq!(report.total_records, 6);
        let tx_stat = report
            .category_stats
            .iter()
            .find(|s| s.category == Category::Transaction)
            .unwrap();
        assert_eq!(tx_stat.count, 4);

        assert_eq!(report.transaction_stats.total_count, 3);
        assert_eq!(report.transaction_stats.debit_count, 2);
        assert_eq!(report.transaction_stats.total_debits, Money::from_units(23));
        assert_eq!(report.transaction_stats.unique_users, 2);
        assert_eq!(report.transaction_stats.unique_sessions, 2);

        assert_eq!(report.overdrafts.len(), 1);
        assert_eq!(report.overdrafts[0].id, "3");
        assert_eq!(report.overdraft_stats.low_balance_count, 1);
        assert_eq!(report.overdraft_stats.at_risk_users, 1);

        let a = &report.user_analysis[0];
        assert_eq!(a.user_id, "a");
        assert_eq!(a.current_balance, Some(Money::from_str("5").unwrap()));
        assert!(!a.overdraft_flag);
        assert!(report.user_analysis[1].overdraft_flag);
    }

    #[test]
    fn test_runs_are_independent() {
        let analyzer = LogAnalyzer::new();
        let lines = ["2024-01-01T10:00:00.1Z\ts\tINFO\tTransaction {\"id\":\"x\",\"amount\":3,\"userId\":\"u\"}"];
        let first = analyzer.analyze_lines(lines).unwrap();
        let second = analyzer.analyze_lines(lines).unwrap();
        assert_eq!(first, second);
    }
}
