//! Return on net invested capital.

use crate::ledger::{CashFlow, CashFlowType};

/// Σ deposits − Σ |withdrawals|. Dividends are returns, not capital.
pub fn net_invested_capital(cash_flows: &[CashFlow]) -> f64 {
    cash_flows
        .iter()
        .map(|cf| match cf.cash_flow_type {
            CashFlowType::Deposit => cf.amount,
            CashFlowType::Withdrawal => -cf.amount.abs(),
            CashFlowType::Dividend => 0.0,
        })
        .sum()
}

/// ROI in percent relative to `net_invested_capital`; 0 when nothing is invested.
pub fn calculate_roi(current_nlv: f64, net_invested_capital: f64) -> f64 {
    if net_invested_capital == 0.0 {
        return 0.0;
    }
    (current_nlv - net_invested_capital) / net_invested_capital * 100.0
}
