//! Integration tests running the core services against a real SQLite file.

use chrono::NaiveDate;
use std::sync::Arc;
use tempfile::TempDir;

use leverfolio_core::ingest::BrokerFormat;
use leverfolio_core::ledger::{
    CashFlow, CashFlowType, LedgerRepositoryTrait, LedgerService, LedgerServiceTrait, NewCashFlow,
    NewTransaction, Transaction,
};
use leverfolio_core::portfolio::{
    DailySnapshotRepositoryTrait, PortfolioService, PortfolioServiceTrait,
};
use leverfolio_core::quotes::{PriceMap, StaticPriceProvider};
use leverfolio_core::recommendations::{
    NewRecommendation, RecommendationRepositoryTrait, RecommendationService,
    RecommendationServiceTrait,
};
use leverfolio_core::settings::{SettingsMap, SettingsRepositoryTrait};
use leverfolio_core::utils::time_utils::DEFAULT_TIMEZONE;
use diesel::RunQueryDsl;
use leverfolio_storage_sqlite::{
    get_connection, open, spawn_writer, DailySnapshotRepository, DbPool, LedgerRepository,
    RecommendationRepository, SettingsRepository,
};

struct TestDb {
    // Keeps the database directory alive for the duration of the test.
    _dir: TempDir,
    pool: Arc<DbPool>,
    ledger: Arc<LedgerRepository>,
    snapshots: Arc<DailySnapshotRepository>,
    settings: Arc<SettingsRepository>,
    recommendations: Arc<RecommendationRepository>,
}

fn setup() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db").join("portfolio.db");
    let pool = open(db_path.to_str().unwrap()).unwrap();
    let writer = spawn_writer(pool.as_ref().clone());

    TestDb {
        ledger: Arc::new(LedgerRepository::new(pool.clone(), writer.clone())),
        snapshots: Arc::new(DailySnapshotRepository::new(pool.clone(), writer.clone())),
        settings: Arc::new(SettingsRepository::new(pool.clone(), writer.clone())),
        recommendations: Arc::new(RecommendationRepository::new(pool.clone(), writer)),
        pool,
        _dir: dir,
    }
}

fn prices(entries: &[(&str, f64)]) -> PriceMap {
    entries.iter().map(|(t, p)| (t.to_string(), *p)).collect()
}

fn portfolio_service(db: &TestDb, entries: &[(&str, f64)]) -> PortfolioService {
    PortfolioService::new(
        db.ledger.clone(),
        db.snapshots.clone(),
        Arc::new(StaticPriceProvider::new(prices(entries))),
        DEFAULT_TIMEZONE,
    )
}

fn ledger_service(db: &TestDb) -> LedgerService {
    LedgerService::new(db.ledger.clone(), DEFAULT_TIMEZONE)
}

fn new_tx(id: &str, ticker: &str, date: &str, action: &str, q: f64, p: f64, f: f64) -> NewTransaction {
    NewTransaction {
        id: Some(id.to_string()),
        ticker: ticker.to_string(),
        trade_date: date.to_string(),
        action: action.to_string(),
        quantity: q,
        price: p,
        fees: f,
        currency: None,
        source_file: None,
        raw_data: None,
    }
}

fn deposit(amount: f64) -> NewCashFlow {
    NewCashFlow {
        id: None,
        date: "2024-01-01".to_string(),
        amount,
        cash_flow_type: "DEPOSIT".to_string(),
        description: Some("initial funding".to_string()),
    }
}

fn tx(id: &str, date: &str, action: &str) -> Transaction {
    new_tx(id, "AAPL", date, action, 1.0, 100.0, 0.0)
        .into_transaction()
        .unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[tokio::test]
async fn test_empty_ledger_records_zero_snapshot() {
    let db = setup();
    let service = portfolio_service(&db, &[]);

    let summary = service.get_portfolio_summary().await.unwrap();
    assert_eq!(summary.leverage.nlv, 0.0);
    assert_eq!(summary.leverage.tnv, 0.0);
    assert!(summary.leverage.leverage_ratio.is_infinite());
    assert_eq!(summary.roi, 0.0);

    let snapshot = service.refresh_daily_snapshot_on(day("2024-03-01")).await.unwrap();
    assert_eq!(snapshot.total_nlv, 0.0);
    assert_eq!(db.snapshots.list_snapshots(None, None).unwrap().len(), 1);
}

#[tokio::test]
async fn test_leveraged_position_round_trips_through_sqlite() {
    let db = setup();
    let ledger = ledger_service(&db);
    ledger.add_cash_flow(deposit(10_000.0)).await.unwrap();
    let buy = ledger
        .add_transaction(new_tx("t1", "AAPL", "2024-01-02 10:00:00", "BUY", 100.0, 150.0, 0.0))
        .await
        .unwrap();
    assert_eq!(buy.amount, 15_000.0);

    let at_cost = portfolio_service(&db, &[("AAPL", 150.0)])
        .get_portfolio_summary()
        .await
        .unwrap();
    assert_eq!(at_cost.leverage.tnv, 15_000.0);
    assert_eq!(at_cost.leverage.cash_balance, -5_000.0);
    assert_eq!(at_cost.leverage.nlv, 10_000.0);
    assert!((at_cost.leverage.leverage_ratio - 1.5).abs() < 1e-9);

    let rallied = portfolio_service(&db, &[("AAPL", 200.0)])
        .get_portfolio_summary()
        .await
        .unwrap();
    assert_eq!(rallied.leverage.tnv, 20_000.0);
    assert_eq!(rallied.leverage.nlv, 15_000.0);
    assert!((rallied.leverage.leverage_ratio - 20_000.0 / 15_000.0).abs() < 1e-9);
    assert!((rallied.roi - 50.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_realized_pnl_from_persisted_round_trip() {
    let db = setup();
    let ledger = ledger_service(&db);
    ledger
        .add_transaction(new_tx("t1", "AAPL", "2024-01-02", "BUY", 10.0, 150.0, 0.0))
        .await
        .unwrap();
    ledger
        .add_transaction(new_tx("t2", "AAPL", "2024-01-03", "SELL", 10.0, 160.0, 1.0))
        .await
        .unwrap();

    let summary = portfolio_service(&db, &[]).get_portfolio_summary().await.unwrap();
    let detail = &summary.pnl.details["AAPL"];
    assert_eq!(detail.avg_cost, 150.0);
    assert!((detail.realized_pnl - 99.0).abs() < 1e-9);
    assert_eq!(detail.quantity, 0.0);
    assert_eq!(summary.pnl.unrealized_pnl, 0.0);
    assert!(summary.positions.is_empty());
}

#[tokio::test]
async fn test_snapshot_upsert_keeps_one_row_per_day() {
    let db = setup();
    let ledger = ledger_service(&db);
    ledger.add_cash_flow(deposit(1_000.0)).await.unwrap();
    let service = portfolio_service(&db, &[]);

    let date = day("2024-05-01");
    service.refresh_daily_snapshot_on(date).await.unwrap();
    ledger.add_cash_flow(deposit(500.0)).await.unwrap();
    let second = service.refresh_daily_snapshot_on(date).await.unwrap();

    let rows = db.snapshots.list_snapshots(None, None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0], second);
    assert_eq!(rows[0].total_nlv, 1_500.0);
    assert_eq!(rows[0].invested_capital, 1_500.0);
    assert_eq!(rows[0].pnl, 0.0);
    assert_eq!(db.snapshots.get_snapshot(date).unwrap(), Some(second));
}

#[tokio::test]
async fn test_snapshot_range_is_inclusive_and_oldest_first() {
    let db = setup();
    let service = portfolio_service(&db, &[]);
    for d in ["2024-05-03", "2024-05-01", "2024-05-02"] {
        service.refresh_daily_snapshot_on(day(d)).await.unwrap();
    }

    let all = service.list_snapshots(None, None).unwrap();
    let dates: Vec<_> = all.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![day("2024-05-01"), day("2024-05-02"), day("2024-05-03")]);

    let tail = service
        .list_snapshots(Some(day("2024-05-02")), Some(day("2024-05-03")))
        .unwrap();
    assert_eq!(tail.len(), 2);
    assert!(db.snapshots.get_snapshot(day("2024-06-01")).unwrap().is_none());
}

#[tokio::test]
async fn test_transactions_replay_in_trade_date_then_id_order() {
    let db = setup();
    for t in [
        tx("b", "2024-01-02 09:30:00", "BUY"),
        tx("c", "2024-01-01 09:30:00", "BUY"),
        tx("a", "2024-01-02 09:30:00", "SELL"),
    ] {
        db.ledger.create_transaction(t).await.unwrap();
    }

    let ids: Vec<String> = db
        .ledger
        .list_transactions()
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(ids, vec!["c", "a", "b"]);

    let recent = db.ledger.get_recent_transactions(2).unwrap();
    let recent_ids: Vec<&str> = recent.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(recent_ids, vec!["b", "a"]);
}

#[tokio::test]
async fn test_deleting_unknown_rows_is_not_found() {
    let db = setup();
    let err = db.ledger.delete_transaction("missing").await.unwrap_err();
    assert!(err.is_not_found());
    let err = db.ledger.delete_cash_flow("missing").await.unwrap_err();
    assert!(err.is_not_found());

    let saved = db.ledger.create_transaction(tx("t1", "2024-01-01", "BUY")).await.unwrap();
    let removed = db.ledger.delete_transaction("t1").await.unwrap();
    assert_eq!(removed, saved);
    assert!(db.ledger.list_transactions().unwrap().is_empty());
}

#[tokio::test]
async fn test_cash_flow_signs_are_normalized_on_write() {
    let db = setup();
    let ledger = ledger_service(&db);
    let withdrawal = ledger
        .add_cash_flow(NewCashFlow {
            id: None,
            date: "2024-02-01".to_string(),
            amount: 250.0,
            cash_flow_type: "withdrawal".to_string(),
            description: None,
        })
        .await
        .unwrap();

    let stored: Vec<CashFlow> = db.ledger.list_cash_flows().unwrap();
    assert_eq!(stored, vec![withdrawal]);
    assert_eq!(stored[0].amount, -250.0);
    assert_eq!(stored[0].cash_flow_type, CashFlowType::Withdrawal);
}

#[tokio::test]
async fn test_batch_write_is_all_or_nothing() {
    let db = setup();
    let duplicate = vec![
        tx("dup", "2024-01-01", "BUY"),
        tx("ok", "2024-01-02", "BUY"),
        tx("dup", "2024-01-03", "SELL"),
    ];

    let err = db.ledger.create_ledger_rows(duplicate, vec![]).await.unwrap_err();
    assert!(err.to_string().contains("Unique"));
    assert!(db.ledger.list_transactions().unwrap().is_empty());
}

#[tokio::test]
async fn test_csv_import_lands_rows_and_skips_unfilled() {
    let db = setup();
    let csv = "symbol,date,side,quantity,price,fees,state\n\
               AAPL,2024-01-02,buy,10,150,1,filled\n\
               MSFT,2024-01-03,buy,5,300,0,cancelled\n\
               AAPL,2024-01-04,sell,4,160,1,filled\n";

    let summary = ledger_service(&db)
        .import_csv(csv.as_bytes(), BrokerFormat::Robinhood, "robinhood.csv")
        .await
        .unwrap();
    assert_eq!(summary.transactions_imported, 2);
    assert_eq!(summary.rows_skipped, 1);

    let stored = db.ledger.list_transactions().unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|t| t.source_file.as_deref() == Some("robinhood.csv")));
    assert!(stored[0].raw_data.is_some());
}

#[tokio::test]
async fn test_settings_upsert_and_unknown_keys() {
    let db = setup();
    assert!(db.settings.get_setting("TIMEZONE").unwrap_err().is_not_found());

    db.settings.update_setting("TIMEZONE", "UTC").await.unwrap();
    db.settings.update_setting("TIMEZONE", "Europe/Paris").await.unwrap();
    let bulk = SettingsMap::from([
        ("AI_MODEL".to_string(), "gpt-4o".to_string()),
        ("custom".to_string(), "kept".to_string()),
    ]);
    db.settings.update_settings(&bulk).await.unwrap();

    assert_eq!(db.settings.get_setting("TIMEZONE").unwrap(), "Europe/Paris");
    let all = db.settings.get_settings().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all["custom"], "kept");
}

#[tokio::test]
async fn test_attribution_scores_persist() {
    let db = setup();
    let service = RecommendationService::new(
        db.recommendations.clone(),
        Arc::new(StaticPriceProvider::new(prices(&[("NVDA", 120.0), ("TSLA", 90.0)]))),
        DEFAULT_TIMEZONE,
    );
    for (ticker, price) in [("NVDA", 100.0), ("TSLA", 100.0), ("AMD", 100.0)] {
        service
            .record_recommendation(NewRecommendation {
                agent: "analyst".to_string(),
                ticker: ticker.to_string(),
                signal: "BUY".to_string(),
                price_at_signal: Some(price),
            })
            .await
            .unwrap();
    }

    let summary = service.run_attribution().await.unwrap();
    assert_eq!(summary.evaluated, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.hits, 1);
    assert_eq!(summary.misses, 1);

    let pending = db.recommendations.list_unevaluated().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].ticker, "AMD");

    let all = service.list_recommendations().unwrap();
    let nvda = all.iter().find(|r| r.ticker == "NVDA").unwrap();
    assert_eq!(nvda.outcome_score, 1);
    assert!(nvda.is_evaluated());
}

#[tokio::test]
async fn test_rows_with_timestamped_dates_still_load() {
    let db = setup();
    let mut conn = get_connection(&db.pool).unwrap();
    diesel::sql_query(
        "INSERT INTO cash_flows (id, date, amount, type, description) VALUES \
         ('cf-ibkr', '2024-03-01, 10:00:00', 2.5, 'DIVIDEND', NULL), \
         ('cf-fmt', '2024-01-01 09:00:00', 1000.0, 'DEPOSIT', NULL)",
    )
    .execute(&mut conn)
    .unwrap();
    diesel::sql_query(
        "INSERT INTO daily_snapshots (date, total_nlv, cash_balance, invested_capital, pnl) \
         VALUES ('2024-01-02 00:00:00', 1000.0, 1000.0, 1000.0, 0.0)",
    )
    .execute(&mut conn)
    .unwrap();
    drop(conn);

    let flows = db.ledger.list_cash_flows().unwrap();
    assert_eq!(flows.len(), 2);
    assert_eq!(flows[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(flows[1].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

    let summary = portfolio_service(&db, &[]).get_portfolio_summary().await.unwrap();
    assert_eq!(summary.leverage.nlv, 1002.5);

    let snapshots = db.snapshots.list_snapshots(None, None).unwrap();
    assert_eq!(snapshots[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
}
