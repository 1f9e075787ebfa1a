use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::leverage::{calculate_leverage, LeverageMetrics};
use super::pnl::{calculate_pnl, PnlBreakdown};
use super::positions::{active_positions, Position};
use super::roi::{calculate_roi, net_invested_capital};
use super::snapshot::{DailySnapshot, DailySnapshotRepositoryTrait, SnapshotRecorder};
use crate::errors::Result;
use crate::ledger::{CashFlow, LedgerRepositoryTrait, Transaction};
use crate::quotes::{PriceMap, PriceProviderTrait};
use crate::utils::time_utils::today_in;

/// Everything the dashboard shows in one read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub as_of: NaiveDate,
    pub positions: Vec<Position>,
    pub leverage: LeverageMetrics,
    pub pnl: PnlBreakdown,
    pub net_invested_capital: f64,
    pub roi: f64,
    pub prices: BTreeMap<String, f64>,
}

#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    /// Prices the active positions, recomputes leverage and records today's
    /// snapshot. Runs even when nothing is held.
    async fn refresh_daily_snapshot(&self) -> Result<DailySnapshot>;

    /// Same as [`refresh_daily_snapshot`](Self::refresh_daily_snapshot) for an
    /// explicit calendar date.
    async fn refresh_daily_snapshot_on(&self, date: NaiveDate) -> Result<DailySnapshot>;

    async fn get_portfolio_summary(&self) -> Result<PortfolioSummary>;

    fn list_snapshots(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DailySnapshot>>;
}

pub struct PortfolioService {
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    snapshot_repository: Arc<dyn DailySnapshotRepositoryTrait>,
    price_provider: Arc<dyn PriceProviderTrait>,
    recorder: SnapshotRecorder,
    timezone: Tz,
    // Held from ledger read to upsert so a slow refresh cannot overwrite a
    // newer one. Waiters are served in FIFO order.
    refresh_lock: Mutex<()>,
}

impl PortfolioService {
    pub fn new(
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        snapshot_repository: Arc<dyn DailySnapshotRepositoryTrait>,
        price_provider: Arc<dyn PriceProviderTrait>,
        timezone: Tz,
    ) -> Self {
        let recorder = SnapshotRecorder::new(
            snapshot_repository.clone(),
            ledger_repository.clone(),
            timezone,
        );
        Self {
            ledger_repository,
            snapshot_repository,
            price_provider,
            recorder,
            timezone,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Reads the full ledger and prices whatever is currently held.
    async fn load_priced_ledger(&self) -> Result<(Vec<Transaction>, Vec<CashFlow>, PriceMap)> {
        let transactions = self.ledger_repository.list_transactions()?;
        let cash_flows = self.ledger_repository.list_cash_flows()?;
        let tickers: Vec<String> = active_positions(&transactions)
            .into_iter()
            .map(|p| p.ticker)
            .collect();

        let prices = if tickers.is_empty() {
            PriceMap::new()
        } else {
            self.price_provider.get_current_prices(&tickers).await?
        };
        debug!(
            "Loaded {} transactions, {} cash flows, {} prices",
            transactions.len(),
            cash_flows.len(),
            prices.len()
        );
        Ok((transactions, cash_flows, prices))
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn refresh_daily_snapshot(&self) -> Result<DailySnapshot> {
        self.refresh_daily_snapshot_on(today_in(self.timezone))
            .await
    }

    async fn refresh_daily_snapshot_on(&self, date: NaiveDate) -> Result<DailySnapshot> {
        let _guard = self.refresh_lock.lock().await;
        let (transactions, cash_flows, prices) = self.load_priced_ledger().await?;
        let metrics = calculate_leverage(&transactions, &cash_flows, &prices);
        self.recorder
            .record_daily_snapshot_on(date, metrics.nlv, metrics.cash_balance)
            .await
    }

    async fn get_portfolio_summary(&self) -> Result<PortfolioSummary> {
        let (transactions, cash_flows, prices) = self.load_priced_ledger().await?;
        let leverage = calculate_leverage(&transactions, &cash_flows, &prices);
        let pnl = calculate_pnl(&transactions, &prices)?;
        let invested = net_invested_capital(&cash_flows);

        Ok(PortfolioSummary {
            as_of: today_in(self.timezone),
            positions: active_positions(&transactions),
            roi: calculate_roi(leverage.nlv, invested),
            leverage,
            pnl,
            net_invested_capital: invested,
            prices: prices.into_iter().collect(),
        })
    }

    fn list_snapshots(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DailySnapshot>> {
        self.snapshot_repository.list_snapshots(start_date, end_date)
    }
}
