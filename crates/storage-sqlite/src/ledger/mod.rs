//! SQLite storage implementation for the ledger (transactions and cash flows).

mod model;
mod repository;

pub use model::{CashFlowDB, TransactionDB};
pub use repository::LedgerRepository;

// Re-export trait from core for convenience
pub use leverfolio_core::ledger::LedgerRepositoryTrait;
