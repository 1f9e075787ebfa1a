use async_trait::async_trait;

use super::ledger_model::{CashFlow, ManualTrade, NewCashFlow, NewTransaction, Transaction};
use crate::ingest::{BrokerFormat, ImportSummary};
use crate::Result;

/// Trait defining the contract for ledger persistence.
///
/// Reads are synchronous and borrow a pooled connection; writes go through the
/// storage layer's single writer.
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// All transactions ordered by `(trade_date, id)` ascending.
    fn list_transactions(&self) -> Result<Vec<Transaction>>;

    /// All cash flows ordered by `(date, id)` ascending.
    fn list_cash_flows(&self) -> Result<Vec<CashFlow>>;

    /// Most recent transactions first, capped at `limit`.
    fn get_recent_transactions(&self, limit: i64) -> Result<Vec<Transaction>>;

    async fn create_transaction(&self, transaction: Transaction) -> Result<Transaction>;

    async fn create_cash_flow(&self, cash_flow: CashFlow) -> Result<CashFlow>;

    /// Writes a batch of rows atomically. Either everything lands or nothing does.
    async fn create_ledger_rows(
        &self,
        transactions: Vec<Transaction>,
        cash_flows: Vec<CashFlow>,
    ) -> Result<(usize, usize)>;

    /// Deletes a transaction, returning the removed row. Unknown ids yield
    /// `DatabaseError::NotFound`.
    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    async fn delete_cash_flow(&self, cash_flow_id: &str) -> Result<CashFlow>;
}

/// Trait defining the contract for ledger operations.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    fn list_transactions(&self) -> Result<Vec<Transaction>>;

    fn list_cash_flows(&self) -> Result<Vec<CashFlow>>;

    fn get_recent_transactions(&self, limit: i64) -> Result<Vec<Transaction>>;

    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;

    async fn add_manual_trade(&self, trade: ManualTrade) -> Result<Transaction>;

    async fn add_cash_flow(&self, new_cash_flow: NewCashFlow) -> Result<CashFlow>;

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    async fn delete_cash_flow(&self, cash_flow_id: &str) -> Result<CashFlow>;

    /// Parses a broker export and records every row in one write.
    async fn import_csv(
        &self,
        content: &[u8],
        format: BrokerFormat,
        source_name: &str,
    ) -> Result<ImportSummary>;
}
