//! Average-cost P&L engine.

mod pnl_calculator;
mod pnl_model;


pub use pnl_calculator::{apply_buy, apply_sell, calculate_pnl, replay_cost_basis};
pub use pnl_model::{CostBasisState, PnlBreakdown, PnlDetail};
