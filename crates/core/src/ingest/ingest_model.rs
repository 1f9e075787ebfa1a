use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::IngestError;
use crate::ledger::{CashFlow, Transaction};

/// Supported broker export layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokerFormat {
    /// `ticker` with optional `quantity` and `cost`; builds a watch list or
    /// opening positions.
    Simple,
    Robinhood,
    Ibkr,
}

impl BrokerFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrokerFormat::Simple => "simple",
            BrokerFormat::Robinhood => "robinhood",
            BrokerFormat::Ibkr => "ibkr",
        }
    }
}

impl FromStr for BrokerFormat {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(BrokerFormat::Simple),
            "robinhood" => Ok(BrokerFormat::Robinhood),
            "ibkr" => Ok(BrokerFormat::Ibkr),
            other => Err(IngestError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for BrokerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized rows parsed from one file, not yet persisted.
#[derive(Debug, Clone, Default)]
pub struct ParsedLedgerRows {
    pub transactions: Vec<Transaction>,
    pub cash_flows: Vec<CashFlow>,
    pub rows_skipped: usize,
}

/// Outcome of an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub format: BrokerFormat,
    pub source: String,
    pub transactions_imported: usize,
    pub cash_flows_imported: usize,
    pub rows_skipped: usize,
}
