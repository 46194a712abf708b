//! CSV export of the analysis tables.

use crate::error::Result;
use crate::report::{AnalysisReport, ReportKind};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory the reports are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default file name prefix.
pub const DEFAULT_PREFIX: &str = "calo_analysis";

/// Where and under which names reports are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl ExportConfig {
    /// Default prefix, custom directory.
    pub fn in_dir(output_dir: impl Into<PathBuf>) -> Self {
        ExportConfig {
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    /// `<output_dir>/<prefix>_<name>.csv`
    pub fn path_for(&self, kind: ReportKind) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.csv", self.prefix, kind.name()))
    }
}

/// Paths written by one export; `None` where a dataset was empty and skipped.
pub type ExportSummary = BTreeMap<ReportKind, Option<PathBuf>>;

/// Writes report tables as CSV files.
pub struct CsvExporter {
    config: ExportConfig,
}

impl CsvExporter {
    /// Creates the exporter, creating the output directory if needed.
    pub fn new(config: ExportConfig) -> Result<Self> {
        fs::create_dir_all(&config.output_dir)?;
        Ok(CsvExporter { config })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Writes every non-empty dataset of the report.
    pub fn export(&self, report: &AnalysisReport) -> Result<ExportSummary> {
        let mut summary = ExportSummary::new();
        for kind in ReportKind::ALL {
            let written = match kind {
                ReportKind::Transactions => self.write_table(kind, &report.transactions)?,
                ReportKind::UserAnalysis => self.write_table(kind, &report.user_analysis)?,
                ReportKind::CategoryStats => self.write_table(kind, &report.category_stats)?,
                ReportKind::Overdrafts => self.write_table(kind, &report.overdrafts)?,
            };
            summary.insert(kind, written);
        }
        Ok(summary)
    }

    fn write_table<T: Serialize>(&self, kind: ReportKind, rows: &[T]) -> Result<Option<PathBuf>> {
        if rows.is_empty() {
            info!("Nothing to export for {}", kind);
            return Ok(None);
        }

        let path = self.config.path_for(kind);
        write_rows(&path, rows)?;
        info!("Wrote {} rows of {} to {}", rows.len(), kind, path.display());
        Ok(Some(path))
    }
}

/// Serializes rows to a CSV file, with a header taken from the row type.
pub fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
