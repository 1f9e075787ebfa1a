use log::{debug, warn};
use std::collections::BTreeMap;

use super::{CostBasisState, PnlBreakdown, PnlDetail};
use crate::constants::QUANTITY_EPSILON;
use crate::errors::{CalculatorError, Result};
use crate::ledger::{Transaction, TransactionAction};
use crate::quotes::PriceMap;

/// Applies one BUY to the running state. Fees are capitalised into avg_cost.
pub fn apply_buy(state: &mut CostBasisState, quantity: f64, price: f64, fees: f64) {
    let total_cost = state.quantity * state.avg_cost + quantity * price + fees;
    let new_quantity = state.quantity + quantity;
    state.avg_cost = if new_quantity > 0.0 {
        total_cost / new_quantity
    } else {
        0.0
    };
    state.quantity = new_quantity;
}

/// Applies one SELL and returns the realized P&L of that trade.
///
/// avg_cost is left untouched. Selling more than is held clamps the quantity at
/// zero; short positions are not modelled.
pub fn apply_sell(state: &mut CostBasisState, quantity: f64, price: f64, fees: f64) -> f64 {
    let trade_pnl = (price - state.avg_cost) * quantity - fees;
    state.realized_pnl += trade_pnl;
    state.quantity -= quantity;
    if state.quantity < 0.0 {
        state.quantity = 0.0;
    }
    trade_pnl
}

/// Replays the history in `(trade_date, id)` order and returns the final
/// state per ticker.
pub fn replay_cost_basis(transactions: &[Transaction]) -> Result<BTreeMap<String, CostBasisState>> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by(|a, b| a.replay_key().cmp(&b.replay_key()));

    let mut states: BTreeMap<String, CostBasisState> = BTreeMap::new();
    for tx in ordered {
        ensure_finite(tx)?;
        let state = states.entry(tx.ticker.clone()).or_default();
        match tx.action {
            TransactionAction::Buy => apply_buy(state, tx.quantity, tx.price, tx.fees),
            TransactionAction::Sell => {
                if tx.quantity > state.quantity + QUANTITY_EPSILON {
                    warn!(
                        "Sell of {} {} exceeds held quantity {}; clamping to 0",
                        tx.quantity, tx.ticker, state.quantity
                    );
                }
                apply_sell(state, tx.quantity, tx.price, tx.fees);
            }
            _ => {}
        }
    }
    Ok(states)
}

/// Average-cost realized/unrealized P&L against current prices.
///
/// Open tickers use their current price (0 when missing). Fully closed
/// tickers with realized P&L stay in the details with zero quantity.
pub fn calculate_pnl(transactions: &[Transaction], prices: &PriceMap) -> Result<PnlBreakdown> {
    let states = replay_cost_basis(transactions)?;
    let mut breakdown = PnlBreakdown::default();

    for (ticker, state) in states {
        breakdown.realized_pnl += state.realized_pnl;
        let current_price = prices.get(&ticker).copied().unwrap_or_else(|| {
            if state.quantity > QUANTITY_EPSILON {
                warn!("Missing price for {}; unrealized P&L uses 0", ticker);
            }
            0.0
        });

        if state.quantity > QUANTITY_EPSILON {
            let unrealized = (current_price - state.avg_cost) * state.quantity;
            breakdown.unrealized_pnl += unrealized;
            breakdown.details.insert(
                ticker,
                PnlDetail {
                    quantity: state.quantity,
                    avg_cost: state.avg_cost,
                    current_price,
                    realized_pnl: state.realized_pnl,
                    unrealized_pnl: unrealized,
                    total_pnl: state.realized_pnl + unrealized,
                },
            );
        } else if state.realized_pnl != 0.0 {
            breakdown.details.insert(
                ticker,
                PnlDetail {
                    quantity: 0.0,
                    avg_cost: 0.0,
                    current_price,
                    realized_pnl: state.realized_pnl,
                    unrealized_pnl: 0.0,
                    total_pnl: state.realized_pnl,
                },
            );
        } else {
            debug!("Skipping {} with no position and no realized P&L", ticker);
        }
    }

    breakdown.total_pnl = breakdown.realized_pnl + breakdown.unrealized_pnl;
    Ok(breakdown)
}

fn ensure_finite(tx: &Transaction) -> Result<()> {
    let fields = [
        ("quantity", tx.quantity),
        ("price", tx.price),
        ("fees", tx.fees),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(CalculatorError::NonFiniteValue {
                transaction_id: tx.id.clone(),
                field,
            }
            .into());
        }
    }
    Ok(())
}
