//! Shared test utilities for `stocklens`.
//!
//! This module provides common helper functions for setting up test
//! databases and building test fixtures with sensible defaults.

use crate::{
    config::settings::IngestSettings,
    core::{account, parser::ProductRow},
    entities::user,
    errors::Result,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
///
/// Uses a single pooled connection so every query sees the same in-memory
/// database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options.max_connections(1);
    let db = Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test tenant with the default password `"password123"`.
pub async fn create_test_user(db: &DatabaseConnection, email: &str) -> Result<user::Model> {
    account::create_user(db, email.to_string(), "password123").await
}

/// Sets up a complete test environment with one tenant.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "tenant@example.com").await?;
    Ok((db, user))
}

/// Builds a parsed row with the reference data set:
/// opening 100, procurement [10,0,5], sales [20,5,0],
/// which derives the inventory sequence [90, 85, 90].
#[must_use]
pub fn sample_row(id: &str) -> ProductRow {
    ProductRow {
        id: id.to_string(),
        name: format!("Widget {id}"),
        opening_inventory: 100,
        procurement_qty: [10, 0, 5],
        procurement_price: [2.5, 0.0, 2.4],
        sales_qty: [20, 5, 0],
        sales_price: [4.99, 4.99, 0.0],
    }
}

/// Default ingestion budgets for tests.
#[must_use]
pub fn test_ingest_settings() -> IngestSettings {
    IngestSettings::default()
}
