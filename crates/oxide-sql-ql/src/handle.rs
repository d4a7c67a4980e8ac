//! Database handle abstraction used by dialects.
//!
//! Dialects never open connections themselves. The ORM opens one and attaches
//! it with [`Dialect::set_db`](crate::Dialect::set_db); the dialect only runs
//! catalog lookups and the occasional DDL statement through it.

use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::Transaction;

use crate::dialect::BoxFuture;

/// Generic SQL execution handle.
///
/// Implemented for [`SqlitePool`]. Any engine that can run a scalar count
/// query and open a transaction can back a dialect.
pub trait SqlHandle: Send + Sync {
    /// Runs a query returning a single integer and binds `args` to its
    /// positional placeholders in order.
    fn query_count<'a>(
        &'a self,
        sql: &'a str,
        args: &'a [&'a str],
    ) -> BoxFuture<'a, Result<i64, sqlx::Error>>;

    /// Begins a transaction.
    fn begin(&self) -> BoxFuture<'_, Result<Box<dyn SqlTransaction>, sqlx::Error>>;
}

/// An open transaction obtained from [`SqlHandle::begin`].
///
/// Dropping it without calling [`commit`](SqlTransaction::commit) rolls it back.
pub trait SqlTransaction: Send {
    /// Executes a statement, returning the number of affected rows.
    fn execute<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, Result<u64, sqlx::Error>>;

    /// Commits the transaction.
    fn commit(self: Box<Self>) -> BoxFuture<'static, Result<(), sqlx::Error>>;
}

impl SqlHandle for SqlitePool {
    fn query_count<'a>(
        &'a self,
        sql: &'a str,
        args: &'a [&'a str],
    ) -> BoxFuture<'a, Result<i64, sqlx::Error>> {
        Box::pin(async move {
            let mut query = sqlx::query_scalar::<_, i64>(sql);
            for arg in args {
                query = query.bind(*arg);
            }
            query.fetch_one(self).await
        })
    }

    fn begin(&self) -> BoxFuture<'_, Result<Box<dyn SqlTransaction>, sqlx::Error>> {
        Box::pin(async move {
            let tx = sqlx::Pool::begin(self).await?;
            Ok(Box::new(tx) as Box<dyn SqlTransaction>)
        })
    }
}

impl SqlTransaction for Transaction<'static, Sqlite> {
    fn execute<'a>(&'a mut self, sql: &'a str) -> BoxFuture<'a, Result<u64, sqlx::Error>> {
        Box::pin(async move {
            let result = sqlx::query(sql).execute(&mut **self).await?;
            Ok(result.rows_affected())
        })
    }

    fn commit(self: Box<Self>) -> BoxFuture<'static, Result<(), sqlx::Error>> {
        Box::pin(Transaction::commit(*self))
    }
}
