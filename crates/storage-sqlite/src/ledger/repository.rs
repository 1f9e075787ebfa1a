use async_trait::async_trait;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::{CashFlowDB, TransactionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{cash_flows, transactions};
use leverfolio_core::errors::{DatabaseError, Error, Result};
use leverfolio_core::ledger::{CashFlow, LedgerRepositoryTrait, Transaction};

pub struct LedgerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn to_transactions(rows: Vec<TransactionDB>) -> Result<Vec<Transaction>> {
    rows.into_iter().map(Transaction::try_from).collect()
}

fn to_cash_flows(rows: Vec<CashFlowDB>) -> Result<Vec<CashFlow>> {
    rows.into_iter().map(CashFlow::try_from).collect()
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .select(TransactionDB::as_select())
            .order((transactions::trade_date.asc(), transactions::id.asc()))
            .load::<TransactionDB>(&mut conn)
            .into_core()?;
        to_transactions(rows)
    }

    fn list_cash_flows(&self) -> Result<Vec<CashFlow>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = cash_flows::table
            .select(CashFlowDB::as_select())
            .order((cash_flows::date.asc(), cash_flows::id.asc()))
            .load::<CashFlowDB>(&mut conn)
            .into_core()?;
        to_cash_flows(rows)
    }

    fn get_recent_transactions(&self, limit: i64) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .select(TransactionDB::as_select())
            .order((transactions::trade_date.desc(), transactions::id.desc()))
            .limit(limit)
            .load::<TransactionDB>(&mut conn)
            .into_core()?;
        to_transactions(rows)
    }

    async fn create_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        let row = TransactionDB::from(transaction.clone());
        self.writer
            .exec(move |conn| {
                diesel::insert_into(transactions::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(transaction)
            })
            .await
    }

    async fn create_cash_flow(&self, cash_flow: CashFlow) -> Result<CashFlow> {
        let row = CashFlowDB::from(cash_flow.clone());
        self.writer
            .exec(move |conn| {
                diesel::insert_into(cash_flows::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(cash_flow)
            })
            .await
    }

    async fn create_ledger_rows(
        &self,
        new_transactions: Vec<Transaction>,
        new_cash_flows: Vec<CashFlow>,
    ) -> Result<(usize, usize)> {
        let tx_rows: Vec<TransactionDB> =
            new_transactions.into_iter().map(TransactionDB::from).collect();
        let flow_rows: Vec<CashFlowDB> = new_cash_flows.into_iter().map(CashFlowDB::from).collect();
        debug!(
            "Writing {} transactions and {} cash flows in one batch",
            tx_rows.len(),
            flow_rows.len()
        );

        // One writer job is one IMMEDIATE transaction, so a failing row rolls
        // back the whole batch.
        self.writer
            .exec(move |conn| {
                let mut tx_count = 0;
                for row in &tx_rows {
                    tx_count += diesel::insert_into(transactions::table)
                        .values(row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                let mut flow_count = 0;
                for row in &flow_rows {
                    flow_count += diesel::insert_into(cash_flows::table)
                        .values(row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok((tx_count, flow_count))
            })
            .await
    }

    async fn delete_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let id_owned = transaction_id.to_string();
        self.writer
            .exec(move |conn| {
                let existing = transactions::table
                    .find(&id_owned)
                    .select(TransactionDB::as_select())
                    .first::<TransactionDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| {
                        Error::Database(DatabaseError::NotFound(format!(
                            "Transaction {} not found",
                            id_owned
                        )))
                    })?;

                diesel::delete(transactions::table.find(&id_owned))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Transaction::try_from(existing)
            })
            .await
    }

    async fn delete_cash_flow(&self, cash_flow_id: &str) -> Result<CashFlow> {
        let id_owned = cash_flow_id.to_string();
        self.writer
            .exec(move |conn| {
                let existing = cash_flows::table
                    .find(&id_owned)
                    .select(CashFlowDB::as_select())
                    .first::<CashFlowDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| {
                        Error::Database(DatabaseError::NotFound(format!(
                            "Cash flow {} not found",
                            id_owned
                        )))
                    })?;

                diesel::delete(cash_flows::table.find(&id_owned))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                CashFlow::try_from(existing)
            })
            .await
    }
}
