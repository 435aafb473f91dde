//! Trade execution against the portfolio ledger.
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. The security must exist in the scenario
//! 2. The amount must be positive
//! 3. BUY: cash must cover `amount * price`, then stock must cover `amount`
//! 4. SELL: holdings must cover `amount`
//!
//! An unrecognized action is reported by the caller after [`check_order`]
//! passes, so it never outranks steps 1 and 2.
//!
//! State is only mutated after every check for the action has passed, so a
//! failed call leaves the portfolio untouched.

use rust_decimal::Decimal;

use super::portfolio::PortfolioState;
use super::scenario::Scenario;
use super::submission::Action;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradeError {
    #[error("unknown security {security}")]
    UnknownSecurity { security: String },

    #[error("invalid amount {amount}: must be a positive integer")]
    InvalidAmount { amount: i64 },

    /// `required` saturates at `Decimal::MAX` when the cost is unrepresentable.
    #[error("insufficient capital to buy {amount} {security}: need {required}, have {available}")]
    InsufficientCapital {
        security: String,
        amount: u64,
        required: Decimal,
        available: Decimal,
    },

    #[error("insufficient stock to buy {requested} {security}: {available} available")]
    InsufficientStock {
        security: String,
        requested: u64,
        available: u64,
    },

    #[error("insufficient holdings to sell {requested} {security}: {held} held")]
    InsufficientHoldings {
        security: String,
        requested: u64,
        held: u64,
    },

    #[error("trade value of {amount} {security} is out of range")]
    Overflow { security: String, amount: u64 },
}

/// A successfully applied trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    pub security_index: usize,
    pub amount: u64,
    pub price: Decimal,
    pub value: Decimal,
}

/// Checks that apply to every trade whatever its action: the security must
/// exist and the amount must be positive. Returns the security index and the
/// amount as a share count.
pub fn check_order(
    scenario: &Scenario,
    security: &str,
    amount: i64,
) -> Result<(usize, u64), TradeError> {
    let index = scenario
        .security_index(security)
        .ok_or_else(|| TradeError::UnknownSecurity {
            security: security.to_string(),
        })?;

    match u64::try_from(amount) {
        Ok(a) if a > 0 => Ok((index, a)),
        _ => Err(TradeError::InvalidAmount { amount }),
    }
}

/// Apply one BUY/SELL of `amount` shares of `security` at the `day` price.
///
/// `day` must already be validated against the scenario horizon.
pub fn execute(
    state: &mut PortfolioState,
    scenario: &Scenario,
    day: usize,
    security: &str,
    action: Action,
    amount: i64,
) -> Result<Fill, TradeError> {
    let (index, amount) = check_order(scenario, security, amount)?;

    let price = scenario.price(index, day);
    let holding = state.holding(index);

    let value = match action {
        Action::Buy => {
            // A cost too large to represent exceeds any cash balance.
            let value = price.checked_mul(Decimal::from(amount));
            let value = match value {
                Some(v) if state.cash >= v => v,
                _ => {
                    return Err(TradeError::InsufficientCapital {
                        security: security.to_string(),
                        amount,
                        required: value.unwrap_or(Decimal::MAX),
                        available: state.cash,
                    });
                }
            };
            if amount > holding.available {
                return Err(TradeError::InsufficientStock {
                    security: security.to_string(),
                    requested: amount,
                    available: holding.available,
                });
            }
            let slot = &mut state.holdings[index];
            slot.available -= amount;
            slot.held += amount;
            state.cash -= value;
            value
        }
        Action::Sell => {
            if amount > holding.held {
                return Err(TradeError::InsufficientHoldings {
                    security: security.to_string(),
                    requested: amount,
                    held: holding.held,
                });
            }
            let overflow = || TradeError::Overflow {
                security: security.to_string(),
                amount,
            };
            let value = price.checked_mul(Decimal::from(amount)).ok_or_else(overflow)?;
            let cash = state.cash.checked_add(value).ok_or_else(overflow)?;
            let slot = &mut state.holdings[index];
            slot.available += amount;
            slot.held -= amount;
            state.cash = cash;
            value
        }
    };

    Ok(Fill {
        security_index: index,
        amount,
        price,
        value,
    })
}
