//! Ledger row builders shared by the portfolio unit tests.

use chrono::NaiveDate;

use crate::ledger::{derive_amount, CashFlow, CashFlowType, Transaction, TransactionAction};
use crate::quotes::PriceMap;
use crate::utils::time_utils::parse_trade_date;

pub fn tx(
    id: &str,
    ticker: &str,
    date: &str,
    action: &str,
    quantity: f64,
    price: f64,
    fees: f64,
) -> Transaction {
    let action = TransactionAction::from(action);
    Transaction {
        id: id.to_string(),
        ticker: ticker.to_string(),
        trade_date: parse_trade_date(date).unwrap(),
        amount: derive_amount(&action, quantity, price, fees),
        action,
        quantity,
        price,
        fees,
        currency: "USD".to_string(),
        source_file: None,
        raw_data: None,
    }
}

pub fn cash_flow(id: &str, date: &str, amount: f64, kind: CashFlowType) -> CashFlow {
    CashFlow {
        id: id.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        amount,
        cash_flow_type: kind,
        description: None,
    }
}

pub fn prices(entries: &[(&str, f64)]) -> PriceMap {
    entries
        .iter()
        .map(|(ticker, price)| (ticker.to_string(), *price))
        .collect()
}
