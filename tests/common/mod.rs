#![allow(dead_code)]

use rust_decimal::Decimal;
use std::io::Write;
use tradescore::adapters::scenario_text::parse_scenario;
use tradescore::adapters::submission_text::TextSubmission;
use tradescore::domain::replay::{EvaluationConfig, EvaluationReport, evaluate};
use tradescore::domain::scenario::{Scenario, Security};

/// Two securities over three days with 1000 starting capital.
pub const SAMPLE_SCENARIO: &str = "\
2 3 1000
A 10
10 12 15
B 5
20 18 22
";

pub fn sample_scenario() -> Scenario {
    parse_scenario(SAMPLE_SCENARIO).unwrap()
}

pub fn make_security(name: &str, stock: u64, prices: &[Decimal]) -> Security {
    Security {
        name: name.to_string(),
        stock_available: stock,
        prices: prices.to_vec(),
    }
}

/// `count` securities named S0, S1, ... each priced `day + 1` on every day.
pub fn uniform_scenario(count: usize, days: usize, stock: u64, capital: Decimal) -> Scenario {
    let securities = (0..count)
        .map(|i| {
            let prices: Vec<Decimal> = (0..days).map(|d| Decimal::from(d as u64 + 1)).collect();
            make_security(&format!("S{i}"), stock, &prices)
        })
        .collect();
    Scenario::new(days, capital, securities).unwrap()
}

pub fn evaluate_text(
    scenario: &Scenario,
    text: &str,
    config: EvaluationConfig,
) -> EvaluationReport {
    let submission = TextSubmission::from_text(text);
    evaluate(scenario, &mut submission.reader(), config)
}

pub fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
