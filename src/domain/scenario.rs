//! Market scenario: securities, trading horizon, starting capital.
//!
//! A [`Scenario`] is immutable once built. Construction checks that every
//! security carries exactly one price per day and that names are unique, so
//! the replay can index prices by day without re-validating.

use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Security {
    pub name: String,
    pub stock_available: u64,
    pub prices: Vec<Decimal>,
}

impl Security {
    pub fn final_price(&self) -> Option<Decimal> {
        self.prices.last().copied()
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("number of days must be positive")]
    NoDays,

    #[error("scenario declares no securities")]
    NoSecurities,

    #[error("starting capital must be non-negative")]
    NegativeCapital,

    #[error("security {0} is declared more than once")]
    DuplicateSecurity(String),

    #[error("security {name} has {actual} prices, expected {expected}")]
    PriceCount {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("security {name} has a negative price on day {day}")]
    NegativePrice { name: String, day: usize },
}

#[derive(Debug, Clone)]
pub struct Scenario {
    num_days: usize,
    start_capital: Decimal,
    securities: Vec<Security>,
    index: HashMap<String, usize>,
}

impl Scenario {
    pub fn new(
        num_days: usize,
        start_capital: Decimal,
        securities: Vec<Security>,
    ) -> Result<Self, ScenarioError> {
        if num_days == 0 {
            return Err(ScenarioError::NoDays);
        }
        if securities.is_empty() {
            return Err(ScenarioError::NoSecurities);
        }
        if start_capital.is_sign_negative() && !start_capital.is_zero() {
            return Err(ScenarioError::NegativeCapital);
        }

        let mut index = HashMap::with_capacity(securities.len());
        for (i, security) in securities.iter().enumerate() {
            if security.prices.len() != num_days {
                return Err(ScenarioError::PriceCount {
                    name: security.name.clone(),
                    expected: num_days,
                    actual: security.prices.len(),
                });
            }
            if let Some(day) = security
                .prices
                .iter()
                .position(|p| p.is_sign_negative() && !p.is_zero())
            {
                return Err(ScenarioError::NegativePrice {
                    name: security.name.clone(),
                    day,
                });
            }
            if index.insert(security.name.clone(), i).is_some() {
                return Err(ScenarioError::DuplicateSecurity(security.name.clone()));
            }
        }

        Ok(Scenario {
            num_days,
            start_capital,
            securities,
            index,
        })
    }

    pub fn num_days(&self) -> usize {
        self.num_days
    }

    pub fn last_day(&self) -> usize {
        self.num_days - 1
    }

    pub fn start_capital(&self) -> Decimal {
        self.start_capital
    }

    pub fn securities(&self) -> &[Security] {
        &self.securities
    }

    pub fn security_count(&self) -> usize {
        self.securities.len()
    }

    /// Position of `name` in [`Scenario::securities`].
    pub fn security_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn security(&self, name: &str) -> Option<&Security> {
        self.security_index(name).map(|i| &self.securities[i])
    }

    /// Price of security `index` on `day`. Both must be in range.
    pub fn price(&self, index: usize, day: usize) -> Decimal {
        self.securities[index].prices[day]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn security(name: &str, stock: u64, prices: &[Decimal]) -> Security {
        Security {
            name: name.into(),
            stock_available: stock,
            prices: prices.to_vec(),
        }
    }

    #[test]
    fn builds_index_in_declaration_order() {
        let scenario = Scenario::new(
            2,
            dec!(100),
            vec![
                security("A", 1, &[dec!(1), dec!(2)]),
                security("B", 2, &[dec!(3), dec!(4)]),
            ],
        )
        .unwrap();

        assert_eq!(scenario.security_index("A"), Some(0));
        assert_eq!(scenario.security_index("B"), Some(1));
        assert_eq!(scenario.security_index("C"), None);
        assert_eq!(scenario.price(1, 1), dec!(4));
        assert_eq!(scenario.last_day(), 1);
    }

    #[test]
    fn rejects_price_count_mismatch() {
        let err = Scenario::new(3, dec!(10), vec![security("A", 1, &[dec!(1), dec!(2)])])
            .unwrap_err();
        assert_eq!(
            err,
            ScenarioError::PriceCount {
                name: "A".into(),
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Scenario::new(
            1,
            dec!(10),
            vec![security("A", 1, &[dec!(1)]), security("A", 2, &[dec!(2)])],
        )
        .unwrap_err();
        assert_eq!(err, ScenarioError::DuplicateSecurity("A".into()));
    }

    #[test]
    fn rejects_negative_capital_and_prices() {
        assert_eq!(
            Scenario::new(1, dec!(-1), vec![security("A", 1, &[dec!(1)])]).unwrap_err(),
            ScenarioError::NegativeCapital
        );
        assert_eq!(
            Scenario::new(2, dec!(1), vec![security("A", 1, &[dec!(1), dec!(-0.5)])])
                .unwrap_err(),
            ScenarioError::NegativePrice {
                name: "A".into(),
                day: 1
            }
        );
    }

    #[test]
    fn zero_capital_and_zero_prices_are_allowed() {
        let scenario = Scenario::new(1, dec!(0), vec![security("A", 0, &[dec!(0)])]).unwrap();
        assert_eq!(scenario.start_capital(), dec!(0));
    }

    #[test]
    fn rejects_empty_horizon_and_universe() {
        assert_eq!(
            Scenario::new(0, dec!(1), vec![]).unwrap_err(),
            ScenarioError::NoDays
        );
        assert_eq!(
            Scenario::new(1, dec!(1), vec![]).unwrap_err(),
            ScenarioError::NoSecurities
        );
    }
}
