//! Leverage and net liquidation value.

use log::warn;
use serde::{Deserialize, Serialize};

use super::cash::cash_balance;
use super::positions::aggregate_positions;
use crate::constants::QUANTITY_EPSILON;
use crate::ledger::{CashFlow, Transaction};
use crate::quotes::PriceMap;

/// Point-in-time leverage metrics.
///
/// `leverage_ratio` is `f64::INFINITY` when NLV is not positive; JSON renders
/// that as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeverageMetrics {
    /// Total notional value: Σ |quantity × price|.
    pub tnv: f64,
    /// Net liquidation value: cash plus signed market value.
    pub nlv: f64,
    pub cash_balance: f64,
    pub portfolio_value: f64,
    #[serde(with = "infinite_as_null")]
    pub leverage_ratio: f64,
}

/// Computes TNV, NLV and leverage from the ledger and a (possibly partial)
/// price map. Tickers without a price are valued at 0.
pub fn calculate_leverage(
    transactions: &[Transaction],
    cash_flows: &[CashFlow],
    prices: &PriceMap,
) -> LeverageMetrics {
    let mut tnv = 0.0;
    let mut portfolio_value = 0.0;

    for (ticker, quantity) in aggregate_positions(transactions) {
        if quantity.abs() <= QUANTITY_EPSILON {
            continue;
        }
        let price = match prices.get(&ticker) {
            Some(price) => *price,
            None => {
                warn!(
                    "Missing price for {} (quantity {}); valuing at 0",
                    ticker, quantity
                );
                0.0
            }
        };
        let market_value = quantity * price;
        tnv += market_value.abs();
        portfolio_value += market_value;
    }

    let cash_balance = cash_balance(cash_flows, transactions);
    let nlv = cash_balance + portfolio_value;
    let leverage_ratio = if nlv > 0.0 { tnv / nlv } else { f64::INFINITY };

    LeverageMetrics {
        tnv,
        nlv,
        cash_balance,
        portfolio_value,
        leverage_ratio,
    }
}

mod infinite_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
