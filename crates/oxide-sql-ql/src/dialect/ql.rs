//! ql dialect implementation.
//!
//! [ql] is an embedded SQL database that does not follow the SQL standard
//! closely:
//!
//! - Bind variables are positional: `$1`, `$2`, ...
//! - There is no `PRIMARY KEY` constraint; every row has an implicit `id()`.
//! - Column types are named after their width (`int64`, `float32`, `string`, `blob`,
//!   `time`, `bigint`, `bigrat`, ...).
//! - Metadata lives in the system tables `__Table`, `__Column` and `__Index`.
//! - A database is a single file (or memory), so there is no notion of a
//!   current database and field names are never table-qualified.
//!
//! [ql]: https://gitlab.com/cznic/ql

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BoxFuture, Dialect};
use crate::error::{DialectError, Result};
use crate::field::{FieldKind, StructField};
use crate::handle::SqlHandle;

// ql accepts `AND` as a synonym for `&&`.
const HAS_INDEX_SQL: &str = "SELECT count() FROM __Index WHERE Name = $1 AND TableName = $2";
const HAS_TABLE_SQL: &str = "SELECT count() FROM __Table WHERE Name = $1";
const HAS_COLUMN_SQL: &str = "SELECT count() FROM __Column WHERE Name = $1 AND TableName = $2";

/// Runs of characters not allowed in generated key names.
static KEY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z0-9]+").expect("Invalid key name regex"));

/// Storage mode of a ql database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QlMode {
    /// Non-persistent, in-memory database. Everything is lost on exit.
    #[serde(rename = "ql-mem")]
    Memory,
    /// File-backed database.
    #[serde(rename = "ql")]
    File,
}

impl QlMode {
    /// Returns the dialect name for this mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Memory => "ql-mem",
            Self::File => "ql",
        }
    }
}

impl fmt::Display for QlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QlMode {
    type Err = DialectError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ql-mem" => Ok(Self::Memory),
            "ql" => Ok(Self::File),
            other => Err(DialectError::UnknownDialect(other.to_string())),
        }
    }
}

/// Returns the ql column type for a field kind, or `None` if ql has no
/// matching type.
#[must_use]
pub const fn ql_type(kind: FieldKind) -> Option<&'static str> {
    match kind {
        FieldKind::Bool => Some("bool"),
        FieldKind::Int => Some("int"),
        FieldKind::Int8 => Some("int8"),
        FieldKind::Int16 => Some("int16"),
        FieldKind::Int32 => Some("int32"),
        FieldKind::Int64 => Some("int64"),
        FieldKind::Uint => Some("uint"),
        FieldKind::Uint8 => Some("uint8"),
        FieldKind::Uint16 => Some("uint16"),
        FieldKind::Uint32 => Some("uint32"),
        FieldKind::Uint64 => Some("uint64"),
        FieldKind::Float32 => Some("float32"),
        FieldKind::Float64 => Some("float64"),
        FieldKind::String => Some("string"),
        FieldKind::Bytes => Some("blob"),
        FieldKind::Time => Some("time"),
        FieldKind::BigInt => Some("bigint"),
        FieldKind::BigRat => Some("bigrat"),
        FieldKind::Complex64
        | FieldKind::Complex128
        | FieldKind::Uintptr
        | FieldKind::Map
        | FieldKind::Slice
        | FieldKind::Struct => None,
    }
}

/// ql dialect.
///
/// Use [`QlDialect::file`] for real data and [`QlDialect::memory`] for tests;
/// the two behave the same and differ only in the name they register under.
///
/// The boolean existence checks of [`Dialect`] report `false` both when the
/// object is missing and when the catalog query fails. Use
/// [`try_has_table`](Self::try_has_table) and friends to tell the two apart.
#[derive(Clone)]
pub struct QlDialect {
    mode: QlMode,
    db: Option<Arc<dyn SqlHandle>>,
}

impl QlDialect {
    /// Creates a dialect for the given storage mode.
    #[must_use]
    pub const fn from_mode(mode: QlMode) -> Self {
        Self { mode, db: None }
    }

    /// Creates the dialect for an in-memory ql database (`ql-mem`).
    #[must_use]
    pub const fn memory() -> Self {
        Self::from_mode(QlMode::Memory)
    }

    /// Creates the dialect for a file-backed ql database (`ql`).
    #[must_use]
    pub const fn file() -> Self {
        Self::from_mode(QlMode::File)
    }

    /// Returns the storage mode.
    #[must_use]
    pub const fn mode(&self) -> QlMode {
        self.mode
    }

    /// Returns whether a database handle has been attached.
    #[must_use]
    pub const fn has_db(&self) -> bool {
        self.db.is_some()
    }

    fn db(&self) -> Result<&dyn SqlHandle> {
        self.db
            .as_deref()
            .ok_or_else(|| DialectError::NoHandle(self.mode.name()))
    }

    async fn count(&self, sql: &str, args: &[&str]) -> Result<bool> {
        let db = self.db()?;
        debug!(sql = %sql, args = ?args, "Querying ql catalog");
        let count = db.query_count(sql, args).await?;
        Ok(count > 0)
    }

    /// Checks whether `index_name` exists on `table_name`.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::NoHandle`] if no handle is attached, or the
    /// handle's error if the catalog query fails.
    pub async fn try_has_index(&self, table_name: &str, index_name: &str) -> Result<bool> {
        self.count(HAS_INDEX_SQL, &[index_name, table_name]).await
    }

    /// Checks whether a table exists.
    ///
    /// # Errors
    ///
    /// Same as [`try_has_index`](Self::try_has_index).
    pub async fn try_has_table(&self, table_name: &str) -> Result<bool> {
        self.count(HAS_TABLE_SQL, &[table_name]).await
    }

    /// Checks whether a column exists on a table.
    ///
    /// # Errors
    ///
    /// Same as [`try_has_index`](Self::try_has_index).
    pub async fn try_has_column(&self, table_name: &str, column_name: &str) -> Result<bool> {
        self.count(HAS_COLUMN_SQL, &[column_name, table_name]).await
    }
}

impl Default for QlDialect {
    fn default() -> Self {
        Self::file()
    }
}

impl fmt::Debug for QlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QlDialect")
            .field("mode", &self.mode)
            .field("has_db", &self.has_db())
            .finish()
    }
}

/// Collapses a failed existence check to `false`.
fn absent_on_error(check: &'static str, result: Result<bool>) -> bool {
    result.unwrap_or_else(|err| {
        debug!(check, error = %err, "ql catalog query failed, reporting absent");
        false
    })
}

/// Parses a 64-bit integer literal, keeping it only if it is positive.
///
/// Accepts an optional sign, the `0x`, `0o`, `0b` and legacy `0` (octal)
/// prefixes, and `_` separators between digits.
fn parse_positive(text: &str) -> Option<i64> {
    let (negative, body) = match text.as_bytes().first() {
        Some(b'+') => (false, &text[1..]),
        Some(b'-') => (true, &text[1..]),
        _ => (false, text),
    };

    let lower = body.get(..2).map(str::to_ascii_lowercase);
    let (radix, digits, prefixed) = match lower.as_deref() {
        Some("0x") => (16, &body[2..], true),
        Some("0o") => (8, &body[2..], true),
        Some("0b") => (2, &body[2..], true),
        _ if body.len() > 1 && body.starts_with('0') => (8, &body[1..], true),
        _ => (10, body, false),
    };

    let misplaced_underscore = digits.ends_with('_')
        || digits.contains("__")
        || (!prefixed && digits.starts_with('_'));
    if digits.is_empty() || misplaced_underscore || digits.starts_with(['+', '-']) {
        return None;
    }

    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    let value = u64::from_str_radix(&cleaned, radix).ok()?;
    let value = i64::try_from(value).ok()?;
    (!negative && value > 0).then_some(value)
}

impl Dialect for QlDialect {
    fn name(&self) -> &'static str {
        self.mode.name()
    }

    fn set_db(&mut self, db: Arc<dyn SqlHandle>) {
        self.db = Some(db);
    }

    fn bind_var(&self, index: usize) -> String {
        format!("${index}")
    }

    fn quote(&self, key: &str) -> String {
        key.to_string()
    }

    fn primary_key(&self, _keys: &[String]) -> String {
        String::new()
    }

    fn data_type_of(&self, field: &StructField) -> Result<String> {
        let sql_type = ql_type(field.kind).ok_or_else(|| DialectError::UnsupportedType {
            type_name: field.type_name.clone(),
            kind: field.kind,
            dialect: "ql",
        })?;

        let annotation = field.annotation();
        if annotation.is_empty() {
            Ok(sql_type.to_string())
        } else {
            Ok(format!("{sql_type} {annotation}"))
        }
    }

    fn has_index<'a>(&'a self, table_name: &'a str, index_name: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            absent_on_error("has_index", self.try_has_index(table_name, index_name).await)
        })
    }

    fn has_foreign_key<'a>(
        &'a self,
        _table_name: &'a str,
        _foreign_key_name: &'a str,
    ) -> BoxFuture<'a, bool> {
        Box::pin(async { false })
    }

    fn remove_index<'a>(
        &'a self,
        _table_name: &'a str,
        index_name: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let db = self.db()?;
            let sql = format!("DROP INDEX {index_name}");
            debug!(sql = %sql, "Dropping ql index");

            let mut tx = db.begin().await?;
            tx.execute(&sql).await?;
            tx.commit().await?;
            Ok(())
        })
    }

    fn has_table<'a>(&'a self, table_name: &'a str) -> BoxFuture<'a, bool> {
        Box::pin(async move { absent_on_error("has_table", self.try_has_table(table_name).await) })
    }

    fn has_column<'a>(
        &'a self,
        table_name: &'a str,
        column_name: &'a str,
    ) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            absent_on_error(
                "has_column",
                self.try_has_column(table_name, column_name).await,
            )
        })
    }

    fn limit_and_offset_sql(
        &self,
        limit: Option<&dyn fmt::Display>,
        offset: Option<&dyn fmt::Display>,
    ) -> String {
        let mut sql = String::new();
        if let Some(limit) = limit.and_then(|l| parse_positive(&l.to_string())) {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = offset.and_then(|o| parse_positive(&o.to_string())) {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        sql
    }

    fn select_from_dummy_table(&self) -> String {
        String::new()
    }

    fn last_insert_id_returning_suffix(&self, _table_name: &str, _column_name: &str) -> String {
        String::new()
    }

    fn build_foreign_key_name(&self, table_name: &str, field: &str, dest: &str) -> String {
        let key_name = format!("{table_name}_{field}_{dest}_foreign");
        KEY_NAME_RE.replace_all(&key_name, "_").into_owned()
    }

    fn current_database(&self) -> String {
        String::new()
    }

    fn query_field_name(&self, _name: &str) -> String {
        String::new()
    }
}
