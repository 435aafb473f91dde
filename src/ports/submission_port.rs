//! Submission input port trait.

use crate::domain::error::EvaluationError;
use crate::domain::submission::{SectionHeader, TradeInstruction};

/// Pull interface the replayer drives one record at a time.
///
/// Callers read the section count once, then alternate one
/// [`next_section`](SubmissionSource::next_section) with exactly
/// `trade_count` calls to [`next_trade`](SubmissionSource::next_trade).
/// A source must not read ahead of what it returns, so a rejection earlier in
/// the stream always wins over malformed input later in it.
pub trait SubmissionSource {
    fn section_count(&mut self) -> Result<usize, EvaluationError>;

    fn next_section(&mut self) -> Result<SectionHeader, EvaluationError>;

    fn next_trade(&mut self) -> Result<TradeInstruction, EvaluationError>;
}
