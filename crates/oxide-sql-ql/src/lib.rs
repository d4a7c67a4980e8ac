//! # oxide-sql-ql
//!
//! [ql] dialect for the oxide ORM.
//!
//! ql is an embedded SQL database backed by a file or by memory. Its SQL
//! departs from the standard in ways the ORM has to know about. This crate
//! provides [`QlDialect`], an implementation of the [`Dialect`] trait that
//! translates the ORM's requests into ql syntax.
//!
//! # How ql differs from other dialects
//!
//! - **Bind variables**: positional `$1`, `$2`, ... (like PostgreSQL).
//! - **Identifier quoting**: none; identifiers are emitted as-is.
//! - **Primary keys**: no `PRIMARY KEY` constraint. Rows carry an implicit
//!   `id()` instead, so [`Dialect::primary_key`] is always empty.
//! - **Column types**: `bool`, `int8`..`int64`, `uint8`..`uint64`,
//!   `float32`, `float64`, `string`, `blob`, `time`, `bigint`, `bigrat`.
//!   See [`ql_type`].
//! - **System catalog**: `__Table`, `__Column` and `__Index`, queried by the
//!   existence checks.
//! - **Foreign keys**: not modelled; [`Dialect::has_foreign_key`] is always
//!   false.
//! - **Databases**: a database is a file, so there is no current database
//!   and field names are never table-qualified.
//!
//! The dialect never opens connections. The ORM attaches a [`SqlHandle`]
//! (implemented for sqlx's `SqlitePool`) with [`Dialect::set_db`].
//!
//! [ql]: https://gitlab.com/cznic/ql
//!
//! ## Example
//!
//! ```rust
//! use oxide_sql_ql::{Dialect, DialectRegistry, StructField};
//!
//! let registry = DialectRegistry::with_ql();
//! let dialect = registry.for_url("ql-mem://test.db").unwrap();
//!
//! assert_eq!(dialect.bind_var(1), "$1");
//! assert_eq!(
//!     dialect.limit_and_offset_sql(Some(&5), Some(&10)),
//!     " LIMIT 5 OFFSET 10"
//! );
//!
//! let field = StructField::of::<i64>("id").not_null();
//! assert_eq!(dialect.data_type_of(&field).unwrap(), "int64 NOT NULL");
//! ```

pub mod dialect;
mod error;
pub mod field;
pub mod handle;
mod registry;

pub use dialect::{ql_type, BoxFuture, Dialect, QlDialect, QlMode};
pub use error::{DialectError, Result};
pub use field::{FieldKind, FieldType, StructField};
pub use handle::{SqlHandle, SqlTransaction};
pub use registry::DialectRegistry;
