//! Ledger module - transactions, cash flows, and the service that records them.

mod ledger_model;
mod ledger_service;
mod ledger_traits;

#[cfg(test)]
mod ledger_model_tests;


pub use ledger_model::{
    derive_amount, CashFlow, CashFlowType, ManualTrade, NewCashFlow, NewTransaction,
    Transaction, TransactionAction,
};
pub use ledger_service::LedgerService;
pub use ledger_traits::{LedgerRepositoryTrait, LedgerServiceTrait};
