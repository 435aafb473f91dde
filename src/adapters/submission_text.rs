//! Streaming reader for submission text.
//!
//! ```text
//! <NumberOfDaySections>
//! <Day> <NumberOfTrades>           (per section, followed by)
//! <SecurityName> <BUY|SELL> <Amount>
//! ```
//!
//! Lines are parsed only when the replayer asks for them.

use std::fs;
use std::path::Path;
use tracing::info;

use super::line_reader::{LineError, LineReader};
use crate::domain::error::{EvaluationError, TradescoreError};
use crate::domain::submission::{ActionToken, SectionHeader, TradeInstruction};
use crate::ports::submission_port::SubmissionSource;

impl From<LineError> for EvaluationError {
    fn from(e: LineError) -> Self {
        EvaluationError::malformed(e.line, e.reason)
    }
}

/// Submission text held in memory; the file is closed once read.
#[derive(Debug, Clone)]
pub struct TextSubmission {
    text: String,
}

impl TextSubmission {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TradescoreError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        info!(path = %path.display(), bytes = text.len(), "submission loaded");
        Ok(Self { text })
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn reader(&self) -> TextSubmissionReader<'_> {
        TextSubmissionReader {
            lines: LineReader::new(&self.text),
        }
    }
}

pub struct TextSubmissionReader<'a> {
    lines: LineReader<'a>,
}

fn non_negative(line: usize, value: i64, field: &str) -> Result<usize, EvaluationError> {
    usize::try_from(value)
        .map_err(|_| EvaluationError::malformed(line, format!("{field} must be non-negative")))
}

impl SubmissionSource for TextSubmissionReader<'_> {
    fn section_count(&mut self) -> Result<usize, EvaluationError> {
        let record = self.lines.next_record(1, "section count")?;
        let count: i64 = record.parse(0, "section count")?;
        non_negative(record.line, count, "section count")
    }

    fn next_section(&mut self) -> Result<SectionHeader, EvaluationError> {
        let record = self.lines.next_record(2, "section header")?;
        let day: i64 = record.parse(0, "day")?;
        let trade_count: i64 = record.parse(1, "number of trades")?;
        Ok(SectionHeader {
            line: record.line,
            day,
            trade_count: non_negative(record.line, trade_count, "number of trades")?,
        })
    }

    fn next_trade(&mut self) -> Result<TradeInstruction, EvaluationError> {
        let record = self.lines.next_record(3, "trade")?;
        let amount: i64 = record.parse(2, "amount")?;
        Ok(TradeInstruction {
            line: record.line,
            security: record.tokens[0].to_string(),
            action: ActionToken::parse(record.tokens[1]),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::RejectReason;
    use crate::domain::submission::Action;

    #[test]
    fn reads_sections_and_trades_in_order() {
        let submission = TextSubmission::from_text("1\n0 2\nA BUY 5\nB SELL 1\n");
        let mut reader = submission.reader();

        assert_eq!(reader.section_count().unwrap(), 1);
        let header = reader.next_section().unwrap();
        assert_eq!(
            header,
            SectionHeader {
                line: 2,
                day: 0,
                trade_count: 2
            }
        );
        let first = reader.next_trade().unwrap();
        assert_eq!(first.line, 3);
        assert_eq!(first.action, ActionToken::Known(Action::Buy));
        assert_eq!(first.amount, 5);
        let second = reader.next_trade().unwrap();
        assert_eq!(second.security, "B");
        assert_eq!(second.action, ActionToken::Known(Action::Sell));
    }

    #[test]
    fn negative_day_is_passed_through() {
        let submission = TextSubmission::from_text("1\n-1 0\n");
        let mut reader = submission.reader();
        reader.section_count().unwrap();
        assert_eq!(reader.next_section().unwrap().day, -1);
    }

    #[test]
    fn negative_amount_is_passed_through() {
        let submission = TextSubmission::from_text("1\n0 1\nA SELL -2\n");
        let mut reader = submission.reader();
        reader.section_count().unwrap();
        reader.next_section().unwrap();
        assert_eq!(reader.next_trade().unwrap().amount, -2);
    }

    #[test]
    fn non_numeric_count_is_malformed() {
        let submission = TextSubmission::from_text("one\n");
        let err = submission.reader().section_count().unwrap_err();
        assert_eq!(err.line, 1);
        assert!(matches!(err.reason, RejectReason::MalformedInput { .. }));
    }

    #[test]
    fn negative_trade_count_is_malformed() {
        let submission = TextSubmission::from_text("1\n0 -1\n");
        let mut reader = submission.reader();
        reader.section_count().unwrap();
        let err = reader.next_section().unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(
            err.reason,
            RejectReason::MalformedInput {
                reason: "number of trades must be non-negative".into()
            }
        );
    }

    #[test]
    fn unknown_action_is_read_as_a_raw_token() {
        let submission = TextSubmission::from_text("1\n0 1\nA HOLD 5\n");
        let mut reader = submission.reader();
        reader.section_count().unwrap();
        reader.next_section().unwrap();
        let trade = reader.next_trade().unwrap();
        assert_eq!(trade.line, 3);
        assert_eq!(trade.action, ActionToken::Unknown("HOLD".into()));
    }

    #[test]
    fn malformed_amount_wins_over_unknown_action() {
        let submission = TextSubmission::from_text("1\n0 1\nA HOLD 5.5\n");
        let mut reader = submission.reader();
        reader.section_count().unwrap();
        reader.next_section().unwrap();
        let err = reader.next_trade().unwrap_err();
        assert!(matches!(err.reason, RejectReason::MalformedInput { .. }));
    }

    #[test]
    fn missing_trade_line_points_past_end() {
        let submission = TextSubmission::from_text("1\n0 2\nA BUY 1\n");
        let mut reader = submission.reader();
        reader.section_count().unwrap();
        reader.next_section().unwrap();
        reader.next_trade().unwrap();
        let err = reader.next_trade().unwrap_err();
        assert_eq!(err.line, 4);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = TextSubmission::load("/nonexistent/submission.txt").unwrap_err();
        assert!(matches!(err, TradescoreError::Io(_)));
    }
}
