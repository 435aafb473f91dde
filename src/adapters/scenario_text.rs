//! Scenario text loader.
//!
//! ```text
//! <NumSecurities> <NumDays> <StartCapital>
//! <Name> <StockAvailable>          (NumSecurities times, each followed by)
//! <Price_0> ... <Price_{NumDays-1}>
//! ```

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use tracing::info;

use super::line_reader::{LineError, LineReader};
use crate::domain::error::TradescoreError;
use crate::domain::scenario::{Scenario, ScenarioError, Security};

impl From<LineError> for TradescoreError {
    fn from(e: LineError) -> Self {
        TradescoreError::ScenarioFormat {
            line: e.line,
            reason: e.reason,
        }
    }
}

pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<Scenario, TradescoreError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let scenario = parse_scenario(&text)?;
    info!(
        path = %path.display(),
        securities = scenario.security_count(),
        days = scenario.num_days(),
        capital = %scenario.start_capital(),
        "scenario loaded"
    );
    Ok(scenario)
}

pub fn parse_scenario(text: &str) -> Result<Scenario, TradescoreError> {
    let mut reader = LineReader::new(text);

    let header = reader.next_record(3, "scenario header")?;
    let num_securities: usize = header.parse(0, "number of securities")?;
    let num_days: usize = header.parse(1, "number of days")?;
    let start_capital: Decimal = header.parse(2, "starting capital")?;

    let mut securities = Vec::new();
    // (name line, price line) per security, for error attribution.
    let mut lines = Vec::new();

    for _ in 0..num_securities {
        let name_record = reader.next_record(2, "security name and stock")?;
        let name = name_record.tokens[0].to_string();
        let stock_available: u64 = name_record.parse(1, "stock available")?;

        let price_record = reader.next_record(num_days, "daily prices")?;
        let prices = (0..num_days)
            .map(|day| price_record.parse::<Decimal>(day, "price"))
            .collect::<Result<Vec<_>, _>>()?;

        lines.push((name_record.line, price_record.line));
        securities.push(Security {
            name,
            stock_available,
            prices,
        });
    }

    let names: Vec<String> = securities.iter().map(|s| s.name.clone()).collect();
    Scenario::new(num_days, start_capital, securities).map_err(|e| {
        let line = match &e {
            ScenarioError::DuplicateSecurity(name) => names
                .iter()
                .rposition(|n| n == name)
                .map_or(1, |i| lines[i].0),
            ScenarioError::PriceCount { name, .. } | ScenarioError::NegativePrice { name, .. } => {
                names
                    .iter()
                    .position(|n| n == name)
                    .map_or(1, |i| lines[i].1)
            }
            ScenarioError::NoDays | ScenarioError::NoSecurities | ScenarioError::NegativeCapital => 1,
        };
        TradescoreError::ScenarioFormat {
            line,
            reason: e.to_string(),
        }
    })
}
