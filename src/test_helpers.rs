//! Test helpers for unit tests: an in-memory database and record fixtures.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use crate::migrations::Migrator;
use crate::models::{customer, outlet};

/// Create an in-memory SQLite database with all migrations applied
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

pub async fn create_test_outlet(db: &DatabaseConnection, name: &str) -> outlet::Model {
    outlet::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test outlet")
}

pub async fn create_test_customer(db: &DatabaseConnection, name: &str) -> customer::Model {
    customer::ActiveModel {
        name: Set(name.to_string()),
        phone: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test customer")
}
