//! Transaction Log Analyzer CLI
//!
//! Reads every `.gz` log archive under a directory, analyzes the
//! informational lines and writes CSV reports.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- logs/ [output-dir]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` or `debug` to see pipeline progress

use std::env;
use std::path::PathBuf;
use std::process;
use txlog_analyzer::{AnalyzerError, CsvExporter, ExportConfig, LogAnalyzer, Result};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        if let AnalyzerError::InputNotFound { path } = &e {
            eprintln!("Error: The path '{}' was not found.", path.display());
            eprintln!("Please make sure the path exists and is correct.");
        } else {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(AnalyzerError::MissingArgument);
    }

    let input = PathBuf::from(&args[1]);
    let config = match args.get(2) {
        Some(dir) => ExportConfig::in_dir(dir),
        None => ExportConfig::default(),
    };

    let report = LogAnalyzer::new().analyze_path(&input)?;
    let exporter = CsvExporter::new(config)?;
    let summary = exporter.export(&report)?;

    let tx = &report.transaction_stats;
    let od = &report.overdraft_stats;
    println!("Records analyzed: {}", report.total_records);
    println!(
        "Transactions: {} ({} credits totalling {}, {} debits totalling {})",
        tx.total_count, tx.credit_count, tx.total_credits, tx.debit_count, tx.total_debits
    );
    println!(
        "Users: {}, sessions: {}, negative balances: {}, low balances: {}, at-risk users: {}",
        tx.unique_users,
        tx.unique_sessions,
        od.negative_balance_count,
        od.low_balance_count,
        od.at_risk_users
    );
    for (kind, path) in &summary {
        match path {
            Some(path) => println!("{}: {}", kind, path.display()),
            None => println!("{}: skipped (no rows)", kind),
        }
    }

    Ok(())
}
