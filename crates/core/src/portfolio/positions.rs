//! Net quantity per ticker derived from the transaction history.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::QUANTITY_EPSILON;
use crate::ledger::{Transaction, TransactionAction};

/// Net quantity held for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub ticker: String,
    pub net_quantity: f64,
}

impl Position {
    pub fn is_active(&self) -> bool {
        self.net_quantity > QUANTITY_EPSILON
    }
}

/// Sums BUY minus SELL quantity per ticker.
///
/// Every ticker that appears in the history gets an entry, including
/// watch-only tickers, which sit at 0.
pub fn aggregate_positions(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut positions: BTreeMap<String, f64> = BTreeMap::new();
    for tx in transactions {
        let entry = positions.entry(tx.ticker.clone()).or_insert(0.0);
        match tx.action {
            TransactionAction::Buy => *entry += tx.quantity,
            TransactionAction::Sell => *entry -= tx.quantity,
            _ => {}
        }
    }
    positions
}

/// Positions whose net quantity exceeds [`QUANTITY_EPSILON`].
pub fn active_positions(transactions: &[Transaction]) -> Vec<Position> {
    aggregate_positions(transactions)
        .into_iter()
        .map(|(ticker, net_quantity)| Position {
            ticker,
            net_quantity,
        })
        .filter(Position::is_active)
        .collect()
}

/// Tickers of [`active_positions`], in ticker order.
pub fn active_tickers(transactions: &[Transaction]) -> Vec<String> {
    active_positions(transactions)
        .into_iter()
        .map(|p| p.ticker)
        .collect()
}
