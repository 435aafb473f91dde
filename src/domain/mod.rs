//! Core domain types and logic.

pub mod scenario;
pub mod submission;
pub mod portfolio;
pub mod execution;
pub mod replay;
pub mod config_validation;
pub mod error;
