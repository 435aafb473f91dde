//! CSV ledger adapter implementing ReportPort.
//!
//! Writes one row per executed trade, including trades applied before a
//! rejection stopped the replay.

use std::path::Path;

use crate::domain::error::TradescoreError;
use crate::domain::replay::EvaluationReport;
use crate::ports::report_port::ReportPort;

pub struct CsvLedgerAdapter;

impl CsvLedgerAdapter {
    /// Writes the ledger to any sink, header first.
    pub fn write_to<W: std::io::Write>(
        report: &EvaluationReport,
        sink: W,
    ) -> Result<(), TradescoreError> {
        let mut writer = csv::Writer::from_writer(sink);
        if report.ledger.is_empty() {
            writer
                .write_record([
                    "line",
                    "day",
                    "security",
                    "action",
                    "amount",
                    "price",
                    "cash_after",
                ])
                .map_err(ledger_error)?;
        }
        for entry in &report.ledger {
            writer.serialize(entry).map_err(ledger_error)?;
        }
        writer.flush().map_err(|e| TradescoreError::Ledger {
            reason: format!("failed to flush ledger: {e}"),
        })
    }
}

fn ledger_error(e: csv::Error) -> TradescoreError {
    TradescoreError::Ledger {
        reason: e.to_string(),
    }
}

impl ReportPort for CsvLedgerAdapter {
    fn write(&self, report: &EvaluationReport, output_path: &Path) -> Result<(), TradescoreError> {
        let file = std::fs::File::create(output_path).map_err(|e| TradescoreError::Ledger {
            reason: format!("failed to create {}: {}", output_path.display(), e),
        })?;
        Self::write_to(report, file)
    }
}
