//! Broker CSV parsing.
//!
//! Each format maps its columns onto [`NewTransaction`] / [`NewCashFlow`] and
//! reuses the ledger's validation, so an imported row obeys the same rules as a
//! manual one. The first bad row aborts the file.

use chrono_tz::Tz;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::{BrokerFormat, IngestError, ParsedLedgerRows};
use crate::constants::{
    CASH_FLOW_TYPE_DIVIDEND, TRANSACTION_ACTION_BUY, TRANSACTION_ACTION_SELL,
    TRANSACTION_ACTION_WATCH,
};
use crate::ledger::{NewCashFlow, NewTransaction};
use crate::utils::time_utils::{format_trade_date, now_in};

/// Parses a broker export into ledger rows.
///
/// `tz` supplies "now" for rows that carry no date.
pub fn parse_broker_csv(
    content: &[u8],
    format: BrokerFormat,
    source_name: &str,
    tz: Tz,
) -> Result<ParsedLedgerRows, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::new(&headers);
    let now = format_trade_date(&now_in(tz));

    let mut parsed = ParsedLedgerRows::default();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let row = Row {
            number: i + 1,
            record: &record,
            columns: &columns,
            headers: &headers,
        };
        match format {
            BrokerFormat::Simple => parse_simple_row(&row, source_name, &now, &mut parsed)?,
            BrokerFormat::Robinhood => {
                parse_robinhood_row(&row, source_name, &now, &mut parsed)?
            }
            BrokerFormat::Ibkr => parse_ibkr_row(&row, source_name, &now, &mut parsed)?,
        }
    }

    if parsed.transactions.is_empty() && parsed.cash_flows.is_empty() {
        // Header-only files are accepted; column checks still apply.
        columns.require_for(format)?;
    }

    debug!(
        "Parsed {} transactions and {} cash flows from '{}' ({}), skipped {}",
        parsed.transactions.len(),
        parsed.cash_flows.len(),
        source_name,
        format,
        parsed.rows_skipped
    );
    Ok(parsed)
}

/// Case-insensitive header lookup.
struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    fn new(headers: &StringRecord) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();
        Self { positions }
    }

    fn get(&self, name: &str) -> Option<usize> {
        self.positions.get(&name.to_lowercase()).copied()
    }

    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn require_for(&self, format: BrokerFormat) -> Result<(), IngestError> {
        let required = match format {
            BrokerFormat::Simple => "ticker",
            BrokerFormat::Robinhood => "symbol",
            BrokerFormat::Ibkr => "Symbol",
        };
        if self.has(required) {
            Ok(())
        } else {
            Err(IngestError::MissingColumn(required.to_string()))
        }
    }
}

struct Row<'a> {
    number: usize,
    record: &'a StringRecord,
    columns: &'a ColumnIndex,
    headers: &'a StringRecord,
}

impl Row<'_> {
    fn text(&self, column: &str) -> Option<&str> {
        self.columns
            .get(column)
            .and_then(|i| self.record.get(i))
            .filter(|v| !v.is_empty())
    }

    fn number(&self, column: &str) -> Result<f64, IngestError> {
        match self.text(column) {
            None => Ok(0.0),
            Some(raw) => parse_number(raw).ok_or_else(|| IngestError::InvalidRow {
                row: self.number,
                message: format!("column '{}' is not a number: '{}'", column, raw),
            }),
        }
    }

    fn invalid(&self, err: impl ToString) -> IngestError {
        IngestError::InvalidRow {
            row: self.number,
            message: err.to_string(),
        }
    }

    /// The original row as a JSON object keyed by header.
    fn raw_json(&self) -> String {
        let map: Map<String, Value> = self
            .headers
            .iter()
            .zip(self.record.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        Value::Object(map).to_string()
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' '))
        .collect();
    // Accounting notation: (12.50) means -12.50
    let cleaned = match cleaned.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => format!("-{}", inner),
        None => cleaned,
    };
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_simple_row(
    row: &Row<'_>,
    source_name: &str,
    now: &str,
    parsed: &mut ParsedLedgerRows,
) -> Result<(), IngestError> {
    row.columns.require_for(BrokerFormat::Simple)?;
    let ticker = row
        .text("ticker")
        .ok_or_else(|| row.invalid("ticker is empty"))?;
    let quantity = row.number("quantity")?;
    let price = row.number("cost")?;
    let action = if quantity > 0.0 {
        TRANSACTION_ACTION_BUY
    } else {
        TRANSACTION_ACTION_WATCH
    };

    let transaction = NewTransaction {
        id: None,
        ticker: ticker.to_string(),
        trade_date: now.to_string(),
        action: action.to_string(),
        quantity: quantity.max(0.0),
        price,
        fees: 0.0,
        currency: row.text("currency").map(str::to_string),
        source_file: Some(source_name.to_string()),
        raw_data: Some(row.raw_json()),
    }
    .into_transaction()
    .map_err(|e| row.invalid(e))?;
    parsed.transactions.push(transaction);
    Ok(())
}

fn parse_robinhood_row(
    row: &Row<'_>,
    source_name: &str,
    now: &str,
    parsed: &mut ParsedLedgerRows,
) -> Result<(), IngestError> {
    row.columns.require_for(BrokerFormat::Robinhood)?;
    if row.columns.has("state") {
        let filled = row
            .text("state")
            .map(|s| s.eq_ignore_ascii_case("filled"))
            .unwrap_or(false);
        if !filled {
            parsed.rows_skipped += 1;
            return Ok(());
        }
    }

    let ticker = row
        .text("symbol")
        .ok_or_else(|| row.invalid("symbol is empty"))?;
    let transaction = NewTransaction {
        id: None,
        ticker: ticker.to_string(),
        trade_date: row.text("date").unwrap_or(now).to_string(),
        action: row.text("side").unwrap_or(TRANSACTION_ACTION_BUY).to_string(),
        quantity: row.number("quantity")?,
        price: row.number("price")?,
        fees: row.number("fees")?.abs(),
        currency: None,
        source_file: Some(source_name.to_string()),
        raw_data: Some(row.raw_json()),
    }
    .into_transaction()
    .map_err(|e| row.invalid(e))?;
    parsed.transactions.push(transaction);
    Ok(())
}

fn parse_ibkr_row(
    row: &Row<'_>,
    source_name: &str,
    now: &str,
    parsed: &mut ParsedLedgerRows,
) -> Result<(), IngestError> {
    row.columns.require_for(BrokerFormat::Ibkr)?;
    let kind = if row.columns.has("Type") {
        row.text("Type").unwrap_or_default()
    } else {
        "Trade"
    };

    if kind.eq_ignore_ascii_case("Trade") {
        let ticker = row
            .text("Symbol")
            .ok_or_else(|| row.invalid("Symbol is empty"))?;
        let signed_quantity = row.number("Quantity")?;
        // Zero quantity is booked as a BUY: no shares move and the fee is paid
        // as cost, where a zero-size SELL would fail the fee check.
        let action = if signed_quantity < 0.0 {
            TRANSACTION_ACTION_SELL
        } else {
            TRANSACTION_ACTION_BUY
        };
        let transaction = NewTransaction {
            id: None,
            ticker: ticker.to_string(),
            trade_date: row.text("Date/Time").unwrap_or(now).to_string(),
            action: action.to_string(),
            quantity: signed_quantity.abs(),
            price: row.number("T. Price")?,
            fees: row.number("Comm/Fee")?.abs(),
            currency: row.text("Currency").map(str::to_string),
            source_file: Some(source_name.to_string()),
            raw_data: Some(row.raw_json()),
        }
        .into_transaction()
        .map_err(|e| row.invalid(e))?;
        parsed.transactions.push(transaction);
    } else if kind.eq_ignore_ascii_case("Dividend") {
        let symbol = row.text("Symbol").unwrap_or("UNKNOWN");
        let cash_flow = NewCashFlow {
            id: None,
            date: row.text("Date/Time").unwrap_or(now).to_string(),
            amount: row.number("Amount")?,
            cash_flow_type: CASH_FLOW_TYPE_DIVIDEND.to_string(),
            description: Some(format!("Dividend from {}", symbol)),
        }
        .into_cash_flow()
        .map_err(|e| row.invalid(e))?;
        parsed.cash_flows.push(cash_flow);
    } else {
        parsed.rows_skipped += 1;
    }
    Ok(())
}
