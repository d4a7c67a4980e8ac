//! Field descriptors handed to dialects by the ORM.
//!
//! A [`StructField`] describes one model field: its name, the declared type
//! name, its semantic [`FieldKind`] and the column-constraint tags that end up
//! after the column type in `CREATE TABLE` statements.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use num_bigint::BigInt;
use num_rational::BigRational;
use serde::{Deserialize, Serialize};

/// Semantic kind of a model field, independent of its Rust representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Boolean.
    Bool,
    /// Platform-sized signed integer.
    Int,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Platform-sized unsigned integer.
    Uint,
    /// 8-bit unsigned integer.
    Uint8,
    /// 16-bit unsigned integer.
    Uint16,
    /// 32-bit unsigned integer.
    Uint32,
    /// 64-bit unsigned integer.
    Uint64,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// UTF-8 text.
    String,
    /// Raw byte sequence.
    Bytes,
    /// Point in time.
    Time,
    /// Arbitrary-precision integer.
    BigInt,
    /// Arbitrary-precision rational.
    BigRat,
    /// Complex number with 32-bit parts.
    Complex64,
    /// Complex number with 64-bit parts.
    Complex128,
    /// Pointer-sized unsigned integer.
    Uintptr,
    /// Key/value map.
    Map,
    /// Sequence of non-byte elements.
    Slice,
    /// Any other composite value.
    Struct,
}

impl FieldKind {
    /// Returns the lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Time => "time",
            Self::BigInt => "bigint",
            Self::BigRat => "bigrat",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::Uintptr => "uintptr",
            Self::Map => "map",
            Self::Slice => "slice",
            Self::Struct => "struct",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rust types that can back a model field.
pub trait FieldType {
    /// Semantic kind of the type.
    const KIND: FieldKind;

    /// Name reported in diagnostics.
    const TYPE_NAME: &'static str;
}

macro_rules! impl_field_type {
    ($($ty:ty => $kind:ident, $name:literal;)*) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::$kind;
                const TYPE_NAME: &'static str = $name;
            }
        )*
    };
}

impl_field_type! {
    bool => Bool, "bool";
    isize => Int, "isize";
    i8 => Int8, "i8";
    i16 => Int16, "i16";
    i32 => Int32, "i32";
    i64 => Int64, "i64";
    usize => Uint, "usize";
    u8 => Uint8, "u8";
    u16 => Uint16, "u16";
    u32 => Uint32, "u32";
    u64 => Uint64, "u64";
    f32 => Float32, "f32";
    f64 => Float64, "f64";
    String => String, "String";
    Vec<u8> => Bytes, "Vec<u8>";
    DateTime<Utc> => Time, "DateTime<Utc>";
    NaiveDateTime => Time, "NaiveDateTime";
    BigInt => BigInt, "BigInt";
    BigRational => BigRat, "BigRational";
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND;
    const TYPE_NAME: &'static str = T::TYPE_NAME;
}

/// Description of a single model field.
///
/// # Example
///
/// ```rust
/// use oxide_sql_ql::{FieldKind, StructField};
///
/// let field = StructField::of::<String>("email").not_null().unique();
/// assert_eq!(field.kind, FieldKind::String);
/// assert_eq!(field.annotation(), "NOT NULL UNIQUE");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructField {
    /// Field name.
    pub name: String,
    /// Declared type name, used in error messages.
    pub type_name: String,
    /// Semantic kind.
    pub kind: FieldKind,
    /// Whether the column is `NOT NULL`.
    #[serde(default)]
    pub not_null: bool,
    /// Whether the column is `UNIQUE`.
    #[serde(default)]
    pub unique: bool,
    /// Default value expression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Free-text type hint (size, precision, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_type: Option<String>,
}

impl StructField {
    /// Creates a field descriptor with an explicit kind.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kind,
            not_null: false,
            unique: false,
            default: None,
            additional_type: None,
        }
    }

    /// Creates a field descriptor for the Rust type `T`.
    #[must_use]
    pub fn of<T: FieldType>(name: impl Into<String>) -> Self {
        Self::new(name, T::TYPE_NAME, T::KIND)
    }

    /// Marks the column `NOT NULL`.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Marks the column `UNIQUE`.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the column default expression.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the free-text type hint.
    #[must_use]
    pub fn additional_type(mut self, value: impl Into<String>) -> Self {
        self.additional_type = Some(value.into());
        self
    }

    /// Returns the text that follows the column type, without surrounding
    /// whitespace.
    ///
    /// Parts are emitted as `NOT NULL`, `UNIQUE`, `DEFAULT <value>`, then the
    /// free-text hint. Empty when no tag is set.
    #[must_use]
    pub fn annotation(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if self.not_null {
            parts.push("NOT NULL");
        }
        if self.unique {
            parts.push("UNIQUE");
        }
        let default = self
            .default
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| format!("DEFAULT {value}"));
        if let Some(ref default) = default {
            parts.push(default.as_str());
        }
        if let Some(hint) = self.additional_type.as_deref() {
            parts.push(hint);
        }
        parts
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_kinds() {
        assert_eq!(<bool as FieldType>::KIND, FieldKind::Bool);
        assert_eq!(<i64 as FieldType>::KIND, FieldKind::Int64);
        assert_eq!(<usize as FieldType>::KIND, FieldKind::Uint);
        assert_eq!(<Vec<u8> as FieldType>::KIND, FieldKind::Bytes);
        assert_eq!(<DateTime<Utc> as FieldType>::KIND, FieldKind::Time);
        assert_eq!(<Option<f32> as FieldType>::KIND, FieldKind::Float32);
        assert_eq!(<BigInt as FieldType>::KIND, FieldKind::BigInt);
        assert_eq!(<BigRational as FieldType>::KIND, FieldKind::BigRat);
        assert_eq!(<Option<BigRational> as FieldType>::KIND, FieldKind::BigRat);
    }

    #[test]
    fn test_of_uses_type_name() {
        let field = StructField::of::<Option<NaiveDateTime>>("created_at");
        assert_eq!(field.name, "created_at");
        assert_eq!(field.type_name, "NaiveDateTime");
        assert_eq!(field.kind, FieldKind::Time);
        assert_eq!(field.annotation(), "");
    }

    #[test]
    fn test_annotation_order() {
        let field = StructField::of::<String>("slug")
            .additional_type("  (len(slug) < 64)")
            .default_value("\"draft\"")
            .unique()
            .not_null();
        assert_eq!(
            field.annotation(),
            "NOT NULL UNIQUE DEFAULT \"draft\" (len(slug) < 64)"
        );
    }

    #[test]
    fn test_blank_default_is_ignored() {
        let field = StructField::of::<i32>("qty").default_value("  ");
        assert_eq!(field.annotation(), "");

        let field = StructField::of::<i32>("qty").not_null().default_value("");
        assert_eq!(field.annotation(), "NOT NULL");

        let field = StructField::of::<i32>("qty").default_value(" 7 ");
        assert_eq!(field.annotation(), "DEFAULT 7");
    }

    #[test]
    fn test_blank_hint_is_ignored() {
        let field = StructField::of::<i32>("qty").additional_type("   ");
        assert_eq!(field.annotation(), "");
    }

    #[test]
    fn test_kind_display_matches_serde() {
        for kind in [FieldKind::BigRat, FieldKind::Uint16, FieldKind::Complex128] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn test_descriptor_from_json() {
        let field: StructField =
            serde_json::from_str(r#"{"name":"id","type_name":"i64","kind":"int64","not_null":true}"#)
                .unwrap();
        assert_eq!(field, StructField::of::<i64>("id").not_null());
    }
}
