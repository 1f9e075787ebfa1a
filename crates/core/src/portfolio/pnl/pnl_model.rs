use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running average-cost state for one ticker during replay.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostBasisState {
    pub quantity: f64,
    pub avg_cost: f64,
    pub realized_pnl: f64,
}

/// P&L for a single ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlDetail {
    pub quantity: f64,
    pub avg_cost: f64,
    pub current_price: f64,
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub total_pnl: f64,
}

/// Portfolio-wide realized/unrealized split with per-ticker rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlBreakdown {
    pub realized_pnl: f64,
    pub unrealized_pnl: f64,
    pub total_pnl: f64,
    pub details: BTreeMap<String, PnlDetail>,
}
