//! SQL dialect support.
//!
//! The ORM talks to every backend through the [`Dialect`] trait: placeholder
//! syntax, column types, catalog introspection and the handful of clauses
//! whose spelling differs between databases.

mod ql;

pub use ql::{ql_type, QlDialect, QlMode};

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Result;
use crate::field::StructField;
use crate::handle::SqlHandle;

/// A boxed future for async dialect operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capability set the ORM needs from a database backend.
///
/// The trait is object safe so dialects can live in a
/// [`DialectRegistry`](crate::DialectRegistry) as `Box<dyn Dialect>`.
pub trait Dialect: Send + Sync {
    /// Returns the name the dialect is registered under.
    fn name(&self) -> &'static str;

    /// Attaches the database handle used by catalog queries.
    ///
    /// Replaces any previously attached handle.
    fn set_db(&mut self, db: Arc<dyn SqlHandle>);

    /// Returns the placeholder for the `index`-th (1-based) bind value.
    fn bind_var(&self, index: usize) -> String;

    /// Quotes an identifier so reserved words can be used as names.
    fn quote(&self, key: &str) -> String;

    /// Returns the primary key clause for the given columns.
    fn primary_key(&self, keys: &[String]) -> String;

    /// Returns the column type for a field.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnsupportedType`](crate::DialectError::UnsupportedType)
    /// if the dialect has no column type for the field's kind.
    fn data_type_of(&self, field: &StructField) -> Result<String>;

    /// Checks whether `index_name` exists on `table_name`.
    fn has_index<'a>(&'a self, table_name: &'a str, index_name: &'a str) -> BoxFuture<'a, bool>;

    /// Checks whether the foreign key exists on `table_name`.
    fn has_foreign_key<'a>(
        &'a self,
        table_name: &'a str,
        foreign_key_name: &'a str,
    ) -> BoxFuture<'a, bool>;

    /// Drops an index.
    fn remove_index<'a>(
        &'a self,
        table_name: &'a str,
        index_name: &'a str,
    ) -> BoxFuture<'a, Result<()>>;

    /// Checks whether a table exists.
    fn has_table<'a>(&'a self, table_name: &'a str) -> BoxFuture<'a, bool>;

    /// Checks whether a column exists on a table.
    fn has_column<'a>(&'a self, table_name: &'a str, column_name: &'a str)
        -> BoxFuture<'a, bool>;

    /// Returns the LIMIT/OFFSET suffix for a query.
    fn limit_and_offset_sql(
        &self,
        limit: Option<&dyn fmt::Display>,
        offset: Option<&dyn fmt::Display>,
    ) -> String;

    /// Returns the dummy table for `SELECT <values>` (e.g. `FROM DUAL`).
    fn select_from_dummy_table(&self) -> String;

    /// Returns the suffix that makes an INSERT return the new id.
    fn last_insert_id_returning_suffix(&self, table_name: &str, column_name: &str) -> String;

    /// Builds the canonical name of a foreign key.
    fn build_foreign_key_name(&self, table_name: &str, field: &str, dest: &str) -> String;

    /// Returns the name of the current database.
    fn current_database(&self) -> String;

    /// Returns the prefix used to qualify field names with `name`.
    fn query_field_name(&self, name: &str) -> String;
}
