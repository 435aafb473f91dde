//! Submission replay and scoring.
//!
//! The [`Replayer`] pulls day sections from a [`SubmissionSource`] in order,
//! validates each section header, executes its trades against a single
//! owned [`PortfolioState`] and computes the final score. The first rejection
//! stops the replay; nothing after it is read and nothing before it is undone.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::error::{EvaluationError, RejectReason};
use super::execution::{self, Fill};
use super::portfolio::PortfolioState;
use super::scenario::Scenario;
use super::submission::{Action, SectionHeader, TradeInstruction};
use crate::ports::submission_port::SubmissionSource;

/// Per-day trade ceiling applied by the strict preset.
pub const STRICT_MAX_TRADES_PER_DAY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Base,
    Strict,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("unknown variant {0:?}: expected base or strict")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(Variant::Base),
            "strict" => Ok(Variant::Strict),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Base => f.write_str("base"),
            Variant::Strict => f.write_str("strict"),
        }
    }
}

/// Scoring and validation rules for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationConfig {
    pub include_portfolio_valuation: bool,
    pub reject_duplicate_security_per_day: bool,
    pub max_trades_per_day: Option<usize>,
}

impl EvaluationConfig {
    pub fn base() -> Self {
        EvaluationConfig {
            include_portfolio_valuation: false,
            reject_duplicate_security_per_day: false,
            max_trades_per_day: None,
        }
    }

    pub fn strict() -> Self {
        EvaluationConfig {
            include_portfolio_valuation: true,
            reject_duplicate_security_per_day: true,
            max_trades_per_day: Some(STRICT_MAX_TRADES_PER_DAY),
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Base => Self::base(),
            Variant::Strict => Self::strict(),
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self::base()
    }
}

/// One executed trade, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub line: usize,
    pub day: usize,
    pub security: String,
    pub action: Action,
    pub amount: u64,
    pub price: Decimal,
    pub cash_after: Decimal,
}

#[derive(Debug, Clone)]
pub struct EvaluationReport {
    pub outcome: Result<Decimal, EvaluationError>,
    /// Portfolio as it stood when the replay stopped.
    pub portfolio: PortfolioState,
    pub ledger: Vec<LedgerEntry>,
    pub sections_processed: usize,
}

impl EvaluationReport {
    pub fn score(&self) -> Option<Decimal> {
        self.outcome.as_ref().ok().copied()
    }

    pub fn error(&self) -> Option<&EvaluationError> {
        self.outcome.as_ref().err()
    }

    pub fn trades_executed(&self) -> usize {
        self.ledger.len()
    }

    /// The single result line shown to the user.
    pub fn summary_line(&self) -> String {
        match &self.outcome {
            Ok(score) => format!("Final score: {score}"),
            Err(e) => e.to_string(),
        }
    }
}

pub struct Replayer<'a> {
    scenario: &'a Scenario,
    config: EvaluationConfig,
    state: PortfolioState,
    previous_day: usize,
    last_line: usize,
    sections_processed: usize,
    ledger: Vec<LedgerEntry>,
}

impl<'a> Replayer<'a> {
    pub fn new(scenario: &'a Scenario, config: EvaluationConfig) -> Self {
        Replayer {
            scenario,
            config,
            state: PortfolioState::new(scenario),
            previous_day: 0,
            last_line: 1,
            sections_processed: 0,
            ledger: Vec::new(),
        }
    }

    pub fn run<S: SubmissionSource + ?Sized>(mut self, source: &mut S) -> EvaluationReport {
        let outcome = self.replay(source);
        match &outcome {
            Ok(score) => info!(
                %score,
                sections = self.sections_processed,
                trades = self.ledger.len(),
                "submission accepted"
            ),
            Err(e) => warn!(line = e.line, reason = %e.reason, "submission rejected"),
        }
        EvaluationReport {
            outcome,
            portfolio: self.state,
            ledger: self.ledger,
            sections_processed: self.sections_processed,
        }
    }

    fn replay<S: SubmissionSource + ?Sized>(
        &mut self,
        source: &mut S,
    ) -> Result<Decimal, EvaluationError> {
        let sections = source.section_count()?;
        debug!(sections, "replaying submission");

        for _ in 0..sections {
            let header = source.next_section()?;
            let day = self.begin_section(&header)?;

            let mut traded = HashSet::new();
            for _ in 0..header.trade_count {
                let trade = source.next_trade()?;
                self.apply_trade(day, &trade, &mut traded)?;
            }
            self.sections_processed += 1;
        }

        self.final_score()
    }

    /// Validates a section header and returns its day.
    fn begin_section(&mut self, header: &SectionHeader) -> Result<usize, EvaluationError> {
        self.last_line = header.line;
        let last_day = self.scenario.last_day();

        let day = match usize::try_from(header.day) {
            Ok(d) if d <= last_day => d,
            _ => {
                return Err(EvaluationError::new(
                    header.line,
                    RejectReason::InvalidDay {
                        day: header.day,
                        last_day,
                    },
                ));
            }
        };

        if day < self.previous_day {
            return Err(EvaluationError::new(
                header.line,
                RejectReason::OutOfOrderDay {
                    day,
                    previous: self.previous_day,
                },
            ));
        }
        self.previous_day = day;

        if let Some(limit) = self.config.max_trades_per_day {
            if header.trade_count > limit {
                return Err(EvaluationError::new(
                    header.line,
                    RejectReason::TooManyTrades {
                        day,
                        count: header.trade_count,
                        limit,
                    },
                ));
            }
        }

        debug!(day, trades = header.trade_count, line = header.line, "section");
        Ok(day)
    }

    fn apply_trade(
        &mut self,
        day: usize,
        trade: &TradeInstruction,
        traded: &mut HashSet<usize>,
    ) -> Result<(), EvaluationError> {
        self.last_line = trade.line;
        let reject = |reason: RejectReason| EvaluationError::new(trade.line, reason);

        let action = match trade.action.resolve() {
            Ok(action) => action,
            Err(unknown) => {
                execution::check_order(self.scenario, &trade.security, trade.amount)
                    .map_err(|e| reject(e.into()))?;
                return Err(reject(unknown));
            }
        };

        let Fill {
            security_index,
            amount,
            price,
            ..
        } = execution::execute(
            &mut self.state,
            self.scenario,
            day,
            &trade.security,
            action,
            trade.amount,
        )
        .map_err(|e| reject(e.into()))?;

        debug!(
            line = trade.line,
            day,
            security = %trade.security,
            %action,
            amount,
            %price,
            cash = %self.state.cash,
            "trade executed"
        );
        self.ledger.push(LedgerEntry {
            line: trade.line,
            day,
            security: trade.security.clone(),
            action,
            amount,
            price,
            cash_after: self.state.cash,
        });

        // The trade stays applied even when it turns out to be a duplicate.
        if !traded.insert(security_index) && self.config.reject_duplicate_security_per_day {
            return Err(EvaluationError::new(
                trade.line,
                RejectReason::DuplicateSecurityInDay {
                    security: trade.security.clone(),
                    day,
                },
            ));
        }
        Ok(())
    }

    fn final_score(&self) -> Result<Decimal, EvaluationError> {
        if !self.config.include_portfolio_valuation {
            return Ok(self.state.cash);
        }
        self.state
            .holdings_value(self.scenario)
            .and_then(|value| self.state.cash.checked_add(value))
            .ok_or_else(|| EvaluationError::new(self.last_line, RejectReason::ScoreOverflow))
    }
}

/// Replays `source` against `scenario` and reports the outcome.
pub fn evaluate<S: SubmissionSource + ?Sized>(
    scenario: &Scenario,
    source: &mut S,
    config: EvaluationConfig,
) -> EvaluationReport {
    Replayer::new(scenario, config).run(source)
}
