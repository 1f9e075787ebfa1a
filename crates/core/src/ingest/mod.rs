//! Broker export ingestion.

mod csv_parser;
mod ingest_errors;
mod ingest_model;

pub use csv_parser::parse_broker_csv;
pub use ingest_errors::IngestError;
pub use ingest_model::{BrokerFormat, ImportSummary, ParsedLedgerRows};
