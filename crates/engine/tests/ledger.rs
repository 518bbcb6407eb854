use chrono::{NaiveDate, NaiveDateTime, Timelike};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{Category, Expense, ExpenseDraft, Ledger, reports};
use migration::MigratorTrait;
use uuid::Uuid;

async fn ledger_with_db() -> (Ledger, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (ledger, db)
}

async fn ledger_with_file_db() -> (Ledger, String, std::path::PathBuf) {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("ledger_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder().database(db).build().await.unwrap();

    (ledger, url, path)
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn draft(name: &str, amount: f64, date: NaiveDateTime, category: Category) -> ExpenseDraft {
    ExpenseDraft::new(name, amount, date, category).unwrap()
}

async fn raw_row_count(db: &DatabaseConnection) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT COUNT(*) AS n FROM expenses",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let (ledger, _db) = ledger_with_db().await;
    let input = draft("Groceries", 42.30, at(2026, 10, 18, 10, 15), Category::Food);

    let id = ledger.create(&input).await.unwrap();
    let stored = ledger.get(id).await.unwrap().unwrap();

    assert_eq!(stored.id, id);
    assert_eq!(stored.draft(), input);
}

#[tokio::test]
async fn get_missing_id_is_none() {
    let (ledger, _db) = ledger_with_db().await;
    assert_eq!(ledger.get(999).await.unwrap(), None);
}

#[tokio::test]
async fn sub_millisecond_precision_is_truncated() {
    let (ledger, _db) = ledger_with_db().await;
    let date = at(2026, 10, 18, 10, 15).with_nanosecond(123_456_789).unwrap();
    let id = ledger
        .create(&draft("Coffee", 2.0, date, Category::Food))
        .await
        .unwrap();

    let stored = ledger.get(id).await.unwrap().unwrap();
    assert_eq!(stored.date, date.with_nanosecond(123_000_000).unwrap());
}

#[tokio::test]
async fn ids_are_monotonic_and_never_reused() {
    let (ledger, _db) = ledger_with_db().await;
    let day = at(2026, 10, 18, 9, 0);

    let first = ledger.create(&draft("A", 1.0, day, Category::Food)).await.unwrap();
    let second = ledger.create(&draft("B", 2.0, day, Category::Food)).await.unwrap();
    assert!(second > first);

    assert_eq!(ledger.delete(second).await.unwrap(), 1);
    let third = ledger.create(&draft("C", 3.0, day, Category::Food)).await.unwrap();
    assert!(third > second);

    ledger.delete_all().await.unwrap();
    let fourth = ledger.create(&draft("D", 4.0, day, Category::Food)).await.unwrap();
    assert!(fourth > third);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (ledger, _db) = ledger_with_db().await;
    let id = ledger
        .create(&draft("Taxi", 18.0, at(2026, 10, 17, 23, 0), Category::Travel))
        .await
        .unwrap();

    assert_eq!(ledger.delete(id).await.unwrap(), 1);
    assert_eq!(ledger.delete(id).await.unwrap(), 0);
    assert_eq!(ledger.get(id).await.unwrap(), None);
}

#[tokio::test]
async fn update_replaces_every_field() {
    let (ledger, _db) = ledger_with_db().await;
    let id = ledger
        .create(&draft("Train", 30.0, at(2026, 10, 10, 7, 45), Category::Travel))
        .await
        .unwrap();

    let replacement = draft("Electricity", 80.5, at(2026, 10, 11, 12, 0), Category::Bills).with_id(id);
    assert_eq!(ledger.update(&replacement).await.unwrap(), 1);
    assert_eq!(ledger.get(id).await.unwrap(), Some(replacement));
}

#[tokio::test]
async fn update_of_missing_id_inserts_nothing() {
    let (ledger, db) = ledger_with_db().await;
    ledger
        .create(&draft("Book", 12.0, at(2026, 10, 1, 18, 0), Category::Shopping))
        .await
        .unwrap();

    let ghost = Expense {
        id: 4242,
        name: "Ghost".to_string(),
        amount: 1.0,
        date: at(2026, 10, 1, 18, 0),
        category: Category::Other,
    };
    assert_eq!(ledger.update(&ghost).await.unwrap(), 0);
    assert_eq!(ledger.get(4242).await.unwrap(), None);
    assert_eq!(raw_row_count(&db).await, 1);
}

#[tokio::test]
async fn list_orders_by_date_desc_then_id() {
    let (ledger, _db) = ledger_with_db().await;
    let same = at(2026, 10, 15, 12, 0);

    let old = ledger.create(&draft("Old", 1.0, at(2026, 10, 1, 8, 0), Category::Food)).await.unwrap();
    let tie_a = ledger.create(&draft("Tie A", 2.0, same, Category::Food)).await.unwrap();
    let newest = ledger.create(&draft("New", 3.0, at(2026, 10, 18, 8, 0), Category::Food)).await.unwrap();
    let tie_b = ledger.create(&draft("Tie B", 4.0, same, Category::Food)).await.unwrap();

    let ids: Vec<i64> = ledger.list().await.unwrap().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![newest, tie_a, tie_b, old]);
    assert_eq!(ledger.count().await.unwrap(), 4);
}

#[tokio::test]
async fn list_by_date_range_is_inclusive() {
    let (ledger, _db) = ledger_with_db().await;
    let start = at(2026, 10, 12, 0, 0);
    let end = at(2026, 10, 18, 0, 0);

    ledger.create(&draft("Before", 1.0, at(2026, 10, 11, 23, 59), Category::Food)).await.unwrap();
    let on_start = ledger.create(&draft("Start", 2.0, start, Category::Food)).await.unwrap();
    let inside = ledger.create(&draft("Inside", 3.0, at(2026, 10, 14, 13, 0), Category::Bills)).await.unwrap();
    let on_end = ledger.create(&draft("End", 4.0, end, Category::Other)).await.unwrap();
    ledger.create(&draft("After", 5.0, at(2026, 10, 18, 0, 1), Category::Food)).await.unwrap();

    let ids: Vec<i64> = ledger
        .list_by_date_range(start, end)
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![on_end, inside, on_start]);
}

#[tokio::test]
async fn list_by_category_filters() {
    let (ledger, _db) = ledger_with_db().await;
    ledger.create(&draft("Lunch", 10.0, at(2026, 10, 18, 12, 0), Category::Food)).await.unwrap();
    let flight = ledger.create(&draft("Flight", 200.0, at(2026, 10, 17, 6, 0), Category::Travel)).await.unwrap();

    let travel = ledger.list_by_category(Category::Travel).await.unwrap();
    assert_eq!(travel.len(), 1);
    assert_eq!(travel[0].id, flight);
    assert!(ledger.list_by_category(Category::Bills).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_all_reports_removed_rows() {
    let (ledger, _db) = ledger_with_db().await;
    assert_eq!(ledger.delete_all().await.unwrap(), 0);

    for i in 0..3u32 {
        ledger
            .create(&draft("Snack", 1.0 + f64::from(i), at(2026, 10, 18, 9, i), Category::Food))
            .await
            .unwrap();
    }
    assert_eq!(ledger.delete_all().await.unwrap(), 3);
    assert!(ledger.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn totals_by_category_lists_every_category() {
    let (ledger, _db) = ledger_with_db().await;

    let empty = ledger.totals_by_category().await.unwrap();
    assert_eq!(empty.len(), Category::ALL.len());
    assert!(empty.values().all(|v| *v == 0.0));

    ledger.create(&draft("Lunch", 25.50, at(2026, 10, 18, 12, 0), Category::Food)).await.unwrap();
    ledger.create(&draft("Dinner", 14.50, at(2026, 10, 18, 20, 0), Category::Food)).await.unwrap();
    ledger.create(&draft("Bus", 15.75, at(2026, 10, 17, 8, 0), Category::Travel)).await.unwrap();

    let totals = ledger.totals_by_category().await.unwrap();
    assert!((totals[&Category::Food] - 40.0).abs() < 1e-9);
    assert!((totals[&Category::Travel] - 15.75).abs() < 1e-9);
    assert_eq!(totals[&Category::Shopping], 0.0);
    assert_eq!(totals[&Category::Bills], 0.0);
    assert_eq!(totals[&Category::Other], 0.0);

    let snapshot = ledger.list().await.unwrap();
    assert_eq!(reports::category_breakdown(&snapshot), totals);
}

#[tokio::test]
async fn snapshot_feeds_reports() {
    let (ledger, _db) = ledger_with_db().await;
    let now = at(2026, 10, 18, 18, 0);
    ledger.create(&draft("Lunch", 25.50, at(2026, 10, 18, 12, 0), Category::Food)).await.unwrap();
    ledger.create(&draft("Taxi", 15.75, at(2026, 10, 17, 22, 0), Category::Travel)).await.unwrap();

    let snapshot = ledger.list().await.unwrap();
    assert!((reports::total_today(&snapshot, now) - 25.50).abs() < 1e-9);

    let progress = reports::budget_progress(reports::total_today(&snapshot, now), 30.0);
    assert!((progress.remaining - 4.50).abs() < 1e-9);
    assert!((progress.fraction_used - 0.85).abs() < 1e-9);
    assert!(!progress.is_over_budget);
}

#[tokio::test]
async fn rows_survive_reconnect() {
    let (ledger, url, path) = ledger_with_file_db().await;
    let id = ledger
        .create(&draft("Rent", 700.0, at(2026, 10, 1, 9, 0), Category::Bills))
        .await
        .unwrap();
    drop(ledger);

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let reopened = Ledger::builder().database(db).build().await.unwrap();
    let stored = reopened.get(id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Rent");
    assert_eq!(stored.category, Category::Bills);

    drop(reopened);
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn closed_database_surfaces_storage_error() {
    let (ledger, db) = ledger_with_db().await;
    db.close().await.unwrap();

    let err = ledger
        .create(&draft("Late", 1.0, at(2026, 10, 18, 9, 0), Category::Other))
        .await
        .unwrap_err();
    assert!(matches!(err, engine::EngineError::Database(_)));
}
