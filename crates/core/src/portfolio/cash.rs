//! Cash balance derived from cash flows and trade settlements.

use log::{debug, warn};

use crate::ledger::{CashFlow, Transaction, TransactionAction};

/// Signed cash effect of one transaction: BUY spends, SELL receives.
pub fn transaction_cash_impact(tx: &Transaction) -> f64 {
    match &tx.action {
        TransactionAction::Buy => -tx.amount,
        TransactionAction::Sell => tx.amount,
        TransactionAction::Watch => {
            debug!("Ignoring WATCH transaction {} for {}", tx.id, tx.ticker);
            0.0
        }
        TransactionAction::Other(action) => {
            warn!(
                "Transaction {} for {} has unsupported action '{}'; excluded from cash balance",
                tx.id, tx.ticker, action
            );
            0.0
        }
    }
}

/// Σ cash flow amounts plus Σ trade cash impact.
pub fn cash_balance(cash_flows: &[CashFlow], transactions: &[Transaction]) -> f64 {
    let flows: f64 = cash_flows.iter().map(|cf| cf.amount).sum();
    let trades: f64 = transactions.iter().map(transaction_cash_impact).sum();
    flows + trades
}
