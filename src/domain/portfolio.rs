//! Portfolio state: cash and per-security share ledger.

use rust_decimal::Decimal;

use super::scenario::Scenario;

/// Shares of one security, split between the portfolio and the market's
/// remaining stock. `held + available` never changes during a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Holding {
    pub held: u64,
    pub available: u64,
}

/// Mutable ledger owned by a single replay. Holdings are indexed the same
/// way as [`Scenario::securities`].
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub cash: Decimal,
    pub holdings: Vec<Holding>,
}

impl PortfolioState {
    pub fn new(scenario: &Scenario) -> Self {
        PortfolioState {
            cash: scenario.start_capital(),
            holdings: scenario
                .securities()
                .iter()
                .map(|s| Holding {
                    held: 0,
                    available: s.stock_available,
                })
                .collect(),
        }
    }

    pub fn holding(&self, index: usize) -> Holding {
        self.holdings[index]
    }

    /// Shares currently held of the named security, or `None` if unknown.
    pub fn shares_held(&self, scenario: &Scenario, name: &str) -> Option<u64> {
        scenario
            .security_index(name)
            .map(|i| self.holdings[i].held)
    }

    pub fn shares_available(&self, scenario: &Scenario, name: &str) -> Option<u64> {
        scenario
            .security_index(name)
            .map(|i| self.holdings[i].available)
    }

    /// Mark-to-market value of all held shares at each security's final price.
    pub fn holdings_value(&self, scenario: &Scenario) -> Option<Decimal> {
        let mut total = Decimal::ZERO;
        for (security, holding) in scenario.securities().iter().zip(&self.holdings) {
            if holding.held == 0 {
                continue;
            }
            let value = security
                .final_price()?
                .checked_mul(Decimal::from(holding.held))?;
            total = total.checked_add(value)?;
        }
        Some(total)
    }

    /// True when every security's held and available shares add up to its
    /// initial stock.
    pub fn shares_conserved(&self, scenario: &Scenario) -> bool {
        scenario
            .securities()
            .iter()
            .zip(&self.holdings)
            .all(|(s, h)| h.held.checked_add(h.available) == Some(s.stock_available))
    }
}
