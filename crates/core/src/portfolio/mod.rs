//! Portfolio analytics: positions, cash, leverage, P&L, ROI and daily snapshots.

pub mod cash;
pub mod leverage;
pub mod pnl;
pub mod positions;
pub mod roi;
pub mod snapshot;

mod portfolio_service;


#[cfg(test)]
pub(crate) mod test_fixtures;

pub use cash::{cash_balance, transaction_cash_impact};
pub use leverage::{calculate_leverage, LeverageMetrics};
pub use pnl::{calculate_pnl, CostBasisState, PnlBreakdown, PnlDetail};
pub use portfolio_service::{PortfolioService, PortfolioServiceTrait, PortfolioSummary};
pub use positions::{active_positions, active_tickers, aggregate_positions, Position};
pub use roi::{calculate_roi, net_invested_capital};
pub use snapshot::{DailySnapshot, DailySnapshotRepositoryTrait, SnapshotRecorder};
