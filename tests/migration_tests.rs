//! Migration tests
//!
//! Tests cover:
//! - Applying all migrations (up) and rolling them back (down)
//! - Expected tables after migration
//! - Unique constraints the referral flows rely on
//! - Audit log indexes on the filtered columns

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, DbBackend, Set, SqlErr,
    Statement,
};
use sea_orm_migration::MigratorTrait;

use pos_referral::migrations::Migrator;
use pos_referral::models::referral_setting;

const TABLES: [&str; 8] = [
    "outlets",
    "customers",
    "referral_settings",
    "referral_codes",
    "pos_orders",
    "referral_rewards",
    "audit_logs",
    "referral_redemptions",
];

/// Helper to create a fresh in-memory SQLite database without running migrations
async fn create_sqlite_db() -> DatabaseConnection {
    Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create SQLite test database")
}

async fn table_names(db: &DatabaseConnection) -> Vec<String> {
    schema_names(db, "SELECT name FROM sqlite_master WHERE type = 'table'").await
}

async fn index_names(db: &DatabaseConnection, table: &str) -> Vec<String> {
    let sql = format!(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = '{}'",
        table
    );
    schema_names(db, &sql).await
}

async fn schema_names(db: &DatabaseConnection, sql: &str) -> Vec<String> {
    db.query_all(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
    .await
    .unwrap()
    .iter()
    .map(|row| row.try_get::<String>("", "name").unwrap())
    .collect()
}

#[tokio::test]
async fn test_up_creates_all_tables() {
    let db = create_sqlite_db().await;
    Migrator::up(&db, None).await.unwrap();

    let tables = table_names(&db).await;
    for table in TABLES {
        assert!(tables.iter().any(|t| t == table), "missing table {}", table);
    }

    assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_down_removes_all_tables() {
    let db = create_sqlite_db().await;
    Migrator::up(&db, None).await.unwrap();
    Migrator::down(&db, None).await.unwrap();

    let tables = table_names(&db).await;
    for table in TABLES {
        assert!(!tables.iter().any(|t| t == table), "table {} survived", table);
    }
}

#[tokio::test]
async fn test_one_settings_row_per_outlet() {
    let db = create_sqlite_db().await;
    Migrator::up(&db, None).await.unwrap();

    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        "INSERT INTO outlets (name, created_at) VALUES ('Main', CURRENT_TIMESTAMP)".to_string(),
    ))
    .await
    .unwrap();

    let settings = || {
        let now = Utc::now();
        referral_setting::ActiveModel {
            outlet_id: Set(1),
            name: Set("Referral Settings - 1".to_string()),
            referral_enabled: Set(true),
            referrer_percentage: Set(15.0),
            referred_percentage: Set(10.0),
            referral_code_prefix: Set("REF-".to_string()),
            min_order_amount: Set(0.0),
            max_uses_per_code: Set(1),
            code_validity_days: Set(365),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    };

    settings().insert(&db).await.unwrap();
    let err = settings().insert(&db).await.unwrap_err();
    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn test_audit_log_indexes_match_filters() {
    let db = create_sqlite_db().await;
    Migrator::up(&db, None).await.unwrap();

    let mut indexes: Vec<String> = index_names(&db, "audit_logs")
        .await
        .into_iter()
        .filter(|name| name.starts_with("idx_"))
        .collect();
    indexes.sort();

    assert_eq!(
        indexes,
        vec![
            "idx_audit_logs_action_timestamp",
            "idx_audit_logs_outlet_timestamp",
            "idx_audit_logs_resource_type_timestamp",
        ]
    );
}

#[tokio::test]
async fn test_redemption_backs_one_order() {
    let db = create_sqlite_db().await;
    Migrator::up(&db, None).await.unwrap();

    for sql in [
        "INSERT INTO outlets (name, created_at) VALUES ('Main', CURRENT_TIMESTAMP)",
        "INSERT INTO customers (name, created_at) VALUES ('Ann', CURRENT_TIMESTAMP)",
        "INSERT INTO referral_codes (code, customer_id, outlet_id, max_uses, times_used, \
         total_discount_given, created_date, is_active, auto_deactivated) \
         VALUES ('REF-ANN-0001', 1, 1, 2, 0, 0, CURRENT_TIMESTAMP, 1, 0)",
        "INSERT INTO pos_orders (outlet_id, amount_total, referral_discount, \
         referral_reward_created, referral_reward_amount, created_at) \
         VALUES (1, 90, 10, 0, 0, CURRENT_TIMESTAMP)",
    ] {
        db.execute(Statement::from_string(DbBackend::Sqlite, sql.to_string()))
            .await
            .unwrap();
    }

    let redemption = "INSERT INTO referral_redemptions (referral_code_id, code, outlet_id, \
                      order_amount, discount_amount, order_id, redeemed_at) \
                      VALUES (1, 'REF-ANN-0001', 1, 100, 10, 1, CURRENT_TIMESTAMP)";
    db.execute(Statement::from_string(DbBackend::Sqlite, redemption.to_string()))
        .await
        .unwrap();
    let err = db
        .execute(Statement::from_string(DbBackend::Sqlite, redemption.to_string()))
        .await
        .unwrap_err();
    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
}
