#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use oxide_sql_ql::{Dialect, QlDialect};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Views exposing SQLite's schema under ql's system table names.
pub const CATALOG_VIEWS: &[&str] = &[
    "CREATE VIEW IF NOT EXISTS __Table AS
        SELECT name AS Name FROM sqlite_master WHERE type = 'table'",
    "CREATE VIEW IF NOT EXISTS __Index AS
        SELECT name AS Name, tbl_name AS TableName FROM sqlite_master WHERE type = 'index'",
    "CREATE VIEW IF NOT EXISTS __Column AS
        SELECT p.name AS Name, m.name AS TableName
        FROM sqlite_master AS m JOIN pragma_table_info(m.name) AS p
        WHERE m.type = 'table'",
];

pub const MIGRATION: &[&str] = &[
    "CREATE TABLE Orders (CustomerID INTEGER, Date TEXT)",
    "CREATE INDEX OrdersID ON Orders (CustomerID)",
    "CREATE INDEX OrdersDate ON Orders (Date)",
    "CREATE TABLE Items (OrderID INTEGER, ProductID INTEGER, Qty INTEGER)",
    "CREATE INDEX ItemsOrderID ON Items (OrderID)",
];

pub async fn run(pool: &SqlitePool, statements: &[&str]) {
    for sql in statements {
        sqlx::query(sql)
            .execute(pool)
            .await
            .unwrap_or_else(|e| panic!("Failed to execute: {sql}\nError: {e}"));
    }
}

pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

pub async fn file_pool(path: &Path) -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("Failed to open SQLite file pool")
}

/// Creates the catalog views and the `Orders`/`Items` schema.
pub async fn migrate(pool: &SqlitePool) {
    run(pool, CATALOG_VIEWS).await;
    run(pool, MIGRATION).await;
}

pub fn attach(mut dialect: QlDialect, pool: &SqlitePool) -> QlDialect {
    dialect.set_db(Arc::new(pool.clone()));
    dialect
}
