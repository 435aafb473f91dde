//! Domain error types.

use super::execution::TradeError;

/// Why a submission was rejected. Every reason is terminal for the evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("invalid day {day}: must be between 0 and {last_day}")]
    InvalidDay { day: i64, last_day: usize },

    #[error("day {day} is before previously processed day {previous}")]
    OutOfOrderDay { day: usize, previous: usize },

    #[error("too many trades on day {day}: {count} exceeds the limit of {limit}")]
    TooManyTrades {
        day: usize,
        count: usize,
        limit: usize,
    },

    #[error("unknown action {token:?}: expected BUY or SELL")]
    UnknownAction { token: String },

    #[error("security {security} traded more than once on day {day}")]
    DuplicateSecurityInDay { security: String, day: usize },

    #[error(transparent)]
    Trade(#[from] TradeError),

    #[error("final score is out of range")]
    ScoreOverflow,
}

/// A rejection pinned to the 1-based submission line that caused it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error on line {line}: {reason}")]
pub struct EvaluationError {
    pub line: usize,
    pub reason: RejectReason,
}

impl EvaluationError {
    pub fn new(line: usize, reason: impl Into<RejectReason>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }

    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::new(
            line,
            RejectReason::MalformedInput {
                reason: reason.into(),
            },
        )
    }
}

/// Top-level error type for tradescore.
#[derive(Debug, thiserror::Error)]
pub enum TradescoreError {
    #[error("scenario format error on line {line}: {reason}")]
    ScenarioFormat { line: usize, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error("ledger write error: {reason}")]
    Ledger { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradescoreError> for std::process::ExitCode {
    fn from(err: &TradescoreError) -> Self {
        let code: u8 = match err {
            TradescoreError::Io(_) => 1,
            TradescoreError::ConfigParse { .. } | TradescoreError::ConfigInvalid { .. } => 2,
            TradescoreError::ScenarioFormat { .. } => 3,
            TradescoreError::Evaluation(_) => 4,
            TradescoreError::Ledger { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
