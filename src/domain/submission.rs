//! Submission records: day sections and the trade instructions inside them.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::{EvaluationError, RejectReason};
use crate::ports::submission_port::SubmissionSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

impl FromStr for Action {
    type Err = RejectReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Action::Buy),
            "SELL" => Ok(Action::Sell),
            other => Err(RejectReason::UnknownAction {
                token: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => f.write_str("BUY"),
            Action::Sell => f.write_str("SELL"),
        }
    }
}

/// The action column of a trade line as it was read.
///
/// An unrecognized keyword is kept rather than rejected on the spot, so the
/// security and amount checks still get to fail first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionToken {
    Known(Action),
    Unknown(String),
}

impl ActionToken {
    pub fn parse(token: &str) -> Self {
        match token.parse() {
            Ok(action) => ActionToken::Known(action),
            Err(_) => ActionToken::Unknown(token.to_string()),
        }
    }

    pub fn resolve(&self) -> Result<Action, RejectReason> {
        match self {
            ActionToken::Known(action) => Ok(*action),
            ActionToken::Unknown(token) => Err(RejectReason::UnknownAction {
                token: token.clone(),
            }),
        }
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionToken::Known(action) => action.fmt(f),
            ActionToken::Unknown(token) => f.write_str(token),
        }
    }
}

/// One `<Security> <Action> <Amount>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeInstruction {
    pub line: usize,
    pub security: String,
    pub action: ActionToken,
    pub amount: i64,
}

/// One `<Day> <NumberOfTrades>` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    pub line: usize,
    pub day: i64,
    pub trade_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySection {
    pub line: usize,
    pub day: i64,
    pub trades: Vec<TradeInstruction>,
}

impl DaySection {
    pub fn header(&self) -> SectionHeader {
        SectionHeader {
            line: self.line,
            day: self.day,
            trade_count: self.trades.len(),
        }
    }
}

/// An already-structured submission.
///
/// Line numbers are assigned as they would appear in the text format, so a
/// replay of a `Submission` reports the same lines as a replay of its text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub sections: Vec<DaySection>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section for `day` holding `trades` in order.
    pub fn with_section(mut self, day: i64, trades: &[(&str, Action, i64)]) -> Self {
        let header_line = self.next_line();
        let trades = trades
            .iter()
            .enumerate()
            .map(|(i, (security, action, amount))| TradeInstruction {
                line: header_line + 1 + i,
                security: (*security).to_string(),
                action: ActionToken::Known(*action),
                amount: *amount,
            })
            .collect();
        self.sections.push(DaySection {
            line: header_line,
            day,
            trades,
        });
        self
    }

    fn next_line(&self) -> usize {
        match self.sections.last() {
            Some(s) => s.line + s.trades.len() + 1,
            None => 2,
        }
    }

    pub fn cursor(&self) -> SubmissionCursor<'_> {
        SubmissionCursor {
            submission: self,
            section: 0,
            trade: 0,
        }
    }

    /// Renders the submission in the text format it would be read from.
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n", self.sections.len());
        for section in &self.sections {
            out.push_str(&format!("{} {}\n", section.day, section.trades.len()));
            for t in &section.trades {
                out.push_str(&format!("{} {} {}\n", t.security, t.action, t.amount));
            }
        }
        out
    }
}

/// Walks a [`Submission`] in the same order the replayer reads text.
pub struct SubmissionCursor<'a> {
    submission: &'a Submission,
    section: usize,
    trade: usize,
}

impl SubmissionSource for SubmissionCursor<'_> {
    fn section_count(&mut self) -> Result<usize, EvaluationError> {
        Ok(self.submission.sections.len())
    }

    fn next_section(&mut self) -> Result<SectionHeader, EvaluationError> {
        let section = self.submission.sections.get(self.section).ok_or_else(|| {
            EvaluationError::malformed(self.submission.next_line(), "no more sections")
        })?;
        self.section += 1;
        self.trade = 0;
        Ok(section.header())
    }

    fn next_trade(&mut self) -> Result<TradeInstruction, EvaluationError> {
        let section = self
            .section
            .checked_sub(1)
            .and_then(|i| self.submission.sections.get(i))
            .ok_or_else(|| EvaluationError::malformed(2, "trade requested before any section"))?;
        let trade = section.trades.get(self.trade).ok_or_else(|| {
            EvaluationError::malformed(section.line + self.trade + 1, "no more trades in section")
        })?;
        self.trade += 1;
        Ok(trade.clone())
    }
}
