use async_trait::async_trait;
use chrono_tz::Tz;
use log::{debug, info};
use std::sync::Arc;

use super::ledger_model::{CashFlow, ManualTrade, NewCashFlow, NewTransaction, Transaction};
use super::ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
use crate::errors::{Result, ValidationError};
use crate::ingest::{parse_broker_csv, BrokerFormat, ImportSummary};

/// Service for recording and reading the ledger.
///
/// Does not refresh the daily snapshot itself; callers that mutate the ledger
/// are expected to do so.
pub struct LedgerService {
    repository: Arc<dyn LedgerRepositoryTrait>,
    timezone: Tz,
}

impl LedgerService {
    pub fn new(repository: Arc<dyn LedgerRepositoryTrait>, timezone: Tz) -> Self {
        Self {
            repository,
            timezone,
        }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        self.repository.list_transactions()
    }

    fn list_cash_flows(&self) -> Result<Vec<CashFlow>> {
        self.repository.list_cash_flows()
    }

    fn get_recent_transactions(&self, limit: i64) -> Result<Vec<Transaction>> {
        if limit <= 0 {
            return Err(ValidationError::InvalidInput(format!(
                "limit must be positive, got {}",
                limit
            ))
            .into());
        }
        self.repository.get_recent_transactions(limit)
    }

    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let transaction = new_transaction.into_transaction()?;
        debug!(
            "Recording {} {} {} @ {}",
            transaction.action, transaction.quantity, transaction.ticker, transaction.price
        );
        self.repository.create_transaction(transaction).await
    }

    async fn add_manual_trade(&self, trade: ManualTrade) -> Result<Transaction> {
        let transaction = self
            .add_transaction(trade.into_new_transaction()?)
            .await?;
        info!(
            "Manually recorded trade: {} {} {} @ {}",
            transaction.action, transaction.quantity, transaction.ticker, transaction.price
        );
        Ok(transaction)
    }

    async fn add_cash_flow(&self, new_cash_flow: NewCashFlow) -> Result<CashFlow> {
        let cash_flow = new_cash_flow.into_cash_flow()?;
        debug!(
            "Recording {} of {} on {}",
            cash_flow.cash_flow_type, cash_flow.amount, cash_flow.date
        );
        self.repository.create_cash_flow(cash_flow).await
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.repository.delete_transaction(transaction_id).await
    }

    async fn delete_cash_flow(&self, cash_flow_id: &str) -> Result<CashFlow> {
        self.repository.delete_cash_flow(cash_flow_id).await
    }

    async fn import_csv(
        &self,
        content: &[u8],
        format: BrokerFormat,
        source_name: &str,
    ) -> Result<ImportSummary> {
        let parsed = parse_broker_csv(content, format, source_name, self.timezone)?;
        let rows_skipped = parsed.rows_skipped;
        let (transactions_imported, cash_flows_imported) = self
            .repository
            .create_ledger_rows(parsed.transactions, parsed.cash_flows)
            .await?;

        info!(
            "Imported {} transactions and {} cash flows from '{}' ({})",
            transactions_imported, cash_flows_imported, source_name, format
        );
        Ok(ImportSummary {
            format,
            source: source_name.to_string(),
            transactions_imported,
            cash_flows_imported,
            rows_skipped,
        })
    }
}
