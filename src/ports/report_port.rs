//! Report generation port trait.

use crate::domain::error::TradescoreError;
use crate::domain::replay::EvaluationReport;
use std::path::Path;

/// Port for persisting what an evaluation did.
pub trait ReportPort {
    fn write(&self, report: &EvaluationReport, output_path: &Path) -> Result<(), TradescoreError>;
}
