//! # Transaction Log Analyzer
//!
//! Batch analysis of application logs from a transaction platform: parses
//! tab-delimited log lines, classifies them by keyword, reconstructs the
//! transactions embedded in `Transaction {...}` payloads and derives
//! per-user and overdraft reports.
//!
//! ## Design Principles
//!
//! - **Batch pipeline**: each stage consumes the full output of the previous one
//! - **Fixed-point arithmetic**: money uses 4 decimal places via `rust_decimal`
//! - **Null over zero**: fields missing from a payload stay `None`
//! - **Strict timestamps**: an anchored but invalid timestamp fails the run
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use txlog_analyzer::{CsvExporter, ExportConfig, LogAnalyzer};
//!
//! let report = LogAnalyzer::new().analyze_path(Path::new("logs")).unwrap();
//! let exporter = CsvExporter::new(ExportConfig::default()).unwrap();
//! exporter.export(&report).unwrap();
//! ```

pub mod analyzer;
pub mod category;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod money;
pub mod overdraft;
pub mod record;
pub mod report;
pub mod transaction;
pub mod user;

pub use analyzer::LogAnalyzer;
pub use category::{categorize, Category, CategorizedRecord, CategoryCounts};
pub use error::{AnalyzerError, Result, TimestampError};
pub use export::{CsvExporter, ExportConfig, ExportSummary};
pub use money::Money;
pub use overdraft::{OverdraftReport, OverdraftStats};
pub use record::{LogLine, LogRecord};
pub use report::{AnalysisReport, CategoryStat, ReportKind};
pub use transaction::{Transaction, TransactionStats};
pub use user::UserSummary;
