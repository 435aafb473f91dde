//! Concrete adapter implementations for ports.

pub mod csv_ledger_adapter;
pub mod file_config_adapter;
pub mod line_reader;
pub mod scenario_text;
pub mod submission_text;
