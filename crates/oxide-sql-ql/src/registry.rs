//! Registry of dialects keyed by name.
//!
//! The ORM picks a dialect from the scheme of the connection string
//! (`ql://data.db`, `ql-mem://test.db`). A registry is an ordinary value, so
//! each application (or test) owns its own.

use std::collections::HashMap;

use tracing::debug;

use crate::dialect::{Dialect, QlDialect};
use crate::error::{DialectError, Result};

/// Name → dialect map.
#[derive(Default)]
pub struct DialectRegistry {
    dialects: HashMap<&'static str, Box<dyn Dialect>>,
}

impl DialectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the in-memory and file-backed ql dialects.
    #[must_use]
    pub fn with_ql() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(QlDialect::memory()));
        registry.register(Box::new(QlDialect::file()));
        registry
    }

    /// Registers a dialect under its name, replacing any dialect already
    /// registered under that name.
    pub fn register(&mut self, dialect: Box<dyn Dialect>) {
        let name = dialect.name();
        if self.dialects.insert(name, dialect).is_some() {
            debug!(dialect = name, "Replaced registered dialect");
        } else {
            debug!(dialect = name, "Registered dialect");
        }
    }

    /// Returns the dialect registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Dialect> {
        self.dialects.get(name).map(|dialect| &**dialect)
    }

    /// Returns the dialect registered under `name` for attaching a handle.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Dialect + 'static)> {
        self.dialects.get_mut(name).map(|dialect| &mut **dialect)
    }

    /// Returns the dialect for a connection string such as `ql-mem://test.db`.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnknownDialect`] if the string has no scheme or
    /// no dialect is registered for it.
    pub fn for_url(&self, url: &str) -> Result<&dyn Dialect> {
        let scheme = scheme_of(url).ok_or_else(|| DialectError::UnknownDialect(url.to_string()))?;
        self.get(scheme)
            .ok_or_else(|| DialectError::UnknownDialect(scheme.to_string()))
    }

    /// Returns the registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.dialects.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered dialects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dialects.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }
}

impl std::fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("dialects", &self.names())
            .finish()
    }
}

fn scheme_of(url: &str) -> Option<&str> {
    url.split_once("://")
        .map(|(scheme, _)| scheme)
        .filter(|scheme| !scheme.is_empty())
}
