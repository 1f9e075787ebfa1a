//! Ledger domain models: transactions and cash flows.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::*;
use crate::errors::{Error, Result, ValidationError};
use crate::utils::time_utils::{naive_datetime_format, parse_calendar_date, parse_trade_date};

/// Trade action recorded on a transaction.
///
/// Only `Buy` and `Sell` move quantity or cash. Anything the ledger does not
/// recognise is kept verbatim in `Other` so imported rows survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TransactionAction {
    Buy,
    Sell,
    Watch,
    Other(String),
}

impl TransactionAction {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionAction::Buy => TRANSACTION_ACTION_BUY,
            TransactionAction::Sell => TRANSACTION_ACTION_SELL,
            TransactionAction::Watch => TRANSACTION_ACTION_WATCH,
            TransactionAction::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_trade(&self) -> bool {
        matches!(self, TransactionAction::Buy | TransactionAction::Sell)
    }
}

impl From<&str> for TransactionAction {
    fn from(s: &str) -> Self {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            TRANSACTION_ACTION_BUY => TransactionAction::Buy,
            TRANSACTION_ACTION_SELL => TransactionAction::Sell,
            TRANSACTION_ACTION_WATCH => TransactionAction::Watch,
            _ => TransactionAction::Other(normalized),
        }
    }
}

impl From<String> for TransactionAction {
    fn from(s: String) -> Self {
        TransactionAction::from(s.as_str())
    }
}

impl From<TransactionAction> for String {
    fn from(action: TransactionAction) -> Self {
        action.as_str().to_string()
    }
}

impl fmt::Display for TransactionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded trade (or watch-list entry).
///
/// Immutable once written. `amount` is the non-negative cash magnitude of the
/// trade with fees already folded in (see [`derive_amount`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub ticker: String,
    #[serde(with = "naive_datetime_format")]
    pub trade_date: NaiveDateTime,
    pub action: TransactionAction,
    pub quantity: f64,
    pub price: f64,
    pub fees: f64,
    pub amount: f64,
    pub currency: String,
    pub source_file: Option<String>,
    pub raw_data: Option<String>,
}

impl Transaction {
    /// Replay key: trade date first, id as the tie-break.
    pub fn replay_key(&self) -> (NaiveDateTime, &str) {
        (self.trade_date, self.id.as_str())
    }
}

/// Cash amount for a trade, never negative for valid input
/// ([`NewTransaction::validate`] rejects SELL fees above the gross value).
///
/// BUY pays price plus fees, SELL receives price minus fees, anything else is
/// valued at `quantity × price`.
pub fn derive_amount(action: &TransactionAction, quantity: f64, price: f64, fees: f64) -> f64 {
    let gross = quantity * price;
    match action {
        TransactionAction::Buy => gross + fees,
        TransactionAction::Sell => gross - fees,
        _ => gross,
    }
}

/// Input for recording a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub ticker: String,
    pub trade_date: String,
    pub action: String,
    pub quantity: f64,
    pub price: f64,
    #[serde(default)]
    pub fees: f64,
    pub currency: Option<String>,
    pub source_file: Option<String>,
    pub raw_data: Option<String>,
}

impl NewTransaction {
    /// Validates the new transaction data.
    pub fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            return Err(ValidationError::MissingField("ticker".to_string()).into());
        }
        if self.action.trim().is_empty() {
            return Err(ValidationError::MissingField("action".to_string()).into());
        }
        ensure_non_negative("quantity", self.quantity)?;
        ensure_non_negative("price", self.price)?;
        ensure_non_negative("fees", self.fees)?;
        if TransactionAction::from(self.action.as_str()) == TransactionAction::Sell
            && self.fees > self.quantity * self.price
        {
            return Err(ValidationError::InvalidInput(format!(
                "SELL fees {} exceed gross proceeds {}",
                self.fees,
                self.quantity * self.price
            ))
            .into());
        }
        parse_trade_date(&self.trade_date)?;
        Ok(())
    }

    /// Validates and turns the input into a ledger row, deriving `amount`.
    pub fn into_transaction(self) -> Result<Transaction> {
        self.validate()?;
        let action = TransactionAction::from(self.action.as_str());
        let amount = derive_amount(&action, self.quantity, self.price, self.fees);
        Ok(Transaction {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::now_v7().to_string()),
            ticker: self.ticker.trim().to_uppercase(),
            trade_date: parse_trade_date(&self.trade_date)?,
            action,
            quantity: self.quantity,
            price: self.price,
            fees: self.fees,
            amount,
            currency: self
                .currency
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            source_file: self.source_file,
            raw_data: self.raw_data,
        })
    }
}

/// A trade entered by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualTrade {
    pub ticker: String,
    pub trade_date: String,
    pub action: String,
    pub quantity: f64,
    pub price: f64,
    #[serde(default)]
    pub fees: f64,
    pub currency: Option<String>,
}

impl ManualTrade {
    /// Converts to a [`NewTransaction`] tagged with manual-entry provenance.
    pub fn into_new_transaction(self) -> Result<NewTransaction> {
        let raw = serde_json::json!({
            "source": "manual_entry",
            "ticker": self.ticker,
            "date": self.trade_date,
            "action": self.action,
            "quantity": self.quantity,
            "price": self.price,
            "fees": self.fees,
        });
        Ok(NewTransaction {
            id: None,
            ticker: self.ticker,
            trade_date: self.trade_date,
            action: self.action,
            quantity: self.quantity,
            price: self.price,
            fees: self.fees,
            currency: self.currency,
            source_file: Some(MANUAL_ENTRY_SOURCE.to_string()),
            raw_data: Some(serde_json::to_string(&raw)?),
        })
    }
}

/// Kind of cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashFlowType {
    Deposit,
    Withdrawal,
    Dividend,
}

impl CashFlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashFlowType::Deposit => CASH_FLOW_TYPE_DEPOSIT,
            CashFlowType::Withdrawal => CASH_FLOW_TYPE_WITHDRAWAL,
            CashFlowType::Dividend => CASH_FLOW_TYPE_DIVIDEND,
        }
    }

    /// Applies the stored sign convention: deposits positive, withdrawals
    /// negative, dividends as given.
    pub fn normalize_amount(&self, amount: f64) -> f64 {
        match self {
            CashFlowType::Deposit => amount.abs(),
            CashFlowType::Withdrawal => -amount.abs(),
            CashFlowType::Dividend => amount,
        }
    }
}

impl FromStr for CashFlowType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            CASH_FLOW_TYPE_DEPOSIT => Ok(CashFlowType::Deposit),
            CASH_FLOW_TYPE_WITHDRAWAL => Ok(CashFlowType::Withdrawal),
            CASH_FLOW_TYPE_DIVIDEND => Ok(CashFlowType::Dividend),
            _ => Err(format!("Unknown cash flow type: {}", s)),
        }
    }
}

impl fmt::Display for CashFlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed cash movement. Positive amounts are inflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlow {
    pub id: String,
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(rename = "type")]
    pub cash_flow_type: CashFlowType,
    pub description: Option<String>,
}

/// Input for recording a cash flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCashFlow {
    pub id: Option<String>,
    pub date: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub cash_flow_type: String,
    pub description: Option<String>,
}

impl NewCashFlow {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() {
            return Err(ValidationError::InvalidInput(format!(
                "Cash flow amount must be a finite number, got {}",
                self.amount
            ))
            .into());
        }
        self.cash_flow_type
            .parse::<CashFlowType>()
            .map_err(|e| Error::Validation(ValidationError::InvalidInput(e)))?;
        parse_calendar_date(&self.date)?;
        Ok(())
    }

    /// Validates and normalizes the sign of the amount.
    pub fn into_cash_flow(self) -> Result<CashFlow> {
        self.validate()?;
        let cash_flow_type = self
            .cash_flow_type
            .parse::<CashFlowType>()
            .map_err(|e| Error::Validation(ValidationError::InvalidInput(e)))?;
        Ok(CashFlow {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::now_v7().to_string()),
            date: parse_calendar_date(&self.date)?,
            amount: cash_flow_type.normalize_amount(self.amount),
            cash_flow_type,
            description: self.description.filter(|d| !d.trim().is_empty()),
        })
    }
}

fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidInput(format!(
            "{} must be a finite, non-negative number, got {}",
            field, value
        ))
        .into());
    }
    Ok(())
}
