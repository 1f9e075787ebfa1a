//! Database models for ledger rows.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use leverfolio_core::constants::DATE_FORMAT;
use leverfolio_core::errors::{Error, Result};
use leverfolio_core::ledger::{CashFlow, CashFlowType, Transaction, TransactionAction};
use leverfolio_core::utils::time_utils::{
    format_trade_date, parse_calendar_date, parse_trade_date,
};

/// Database model for a ledger transaction.
///
/// `trade_date` is stored as `YYYY-MM-DD HH:MM:SS` so that text ordering is
/// chronological.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TransactionDB {
    pub id: String,
    pub ticker: String,
    pub trade_date: String,
    pub action: String,
    pub quantity: f64,
    pub price: f64,
    pub fees: f64,
    pub amount: f64,
    pub currency: String,
    pub source_file: Option<String>,
    pub raw_data: Option<String>,
}

impl From<Transaction> for TransactionDB {
    fn from(tx: Transaction) -> Self {
        Self {
            trade_date: format_trade_date(&tx.trade_date),
            action: tx.action.as_str().to_string(),
            id: tx.id,
            ticker: tx.ticker,
            quantity: tx.quantity,
            price: tx.price,
            fees: tx.fees,
            amount: tx.amount,
            currency: tx.currency,
            source_file: tx.source_file,
            raw_data: tx.raw_data,
        }
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self> {
        Ok(Self {
            trade_date: parse_trade_date(&db.trade_date)?,
            action: TransactionAction::from(db.action),
            id: db.id,
            ticker: db.ticker,
            quantity: db.quantity,
            price: db.price,
            fees: db.fees,
            amount: db.amount,
            currency: db.currency,
            source_file: db.source_file,
            raw_data: db.raw_data,
        })
    }
}

/// Database model for a cash flow. The `type` column maps to `cash_flow_type`.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::cash_flows)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CashFlowDB {
    pub id: String,
    pub date: String,
    pub amount: f64,
    pub cash_flow_type: String,
    pub description: Option<String>,
}

impl From<CashFlow> for CashFlowDB {
    fn from(flow: CashFlow) -> Self {
        Self {
            id: flow.id,
            date: flow.date.format(DATE_FORMAT).to_string(),
            amount: flow.amount,
            cash_flow_type: flow.cash_flow_type.as_str().to_string(),
            description: flow.description,
        }
    }
}

impl TryFrom<CashFlowDB> for CashFlow {
    type Error = Error;

    fn try_from(db: CashFlowDB) -> Result<Self> {
        let cash_flow_type = db
            .cash_flow_type
            .parse::<CashFlowType>()
            .map_err(|e| Error::Unexpected(format!("Cash flow {}: {}", db.id, e)))?;
        Ok(Self {
            date: parse_calendar_date(&db.date)?,
            id: db.id,
            amount: db.amount,
            cash_flow_type,
            description: db.description,
        })
    }
}
