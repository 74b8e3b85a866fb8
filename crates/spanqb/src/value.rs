//! Value dispatcher: conversion of Rust values into SQL expressions.
//!
//! [`ToExpr`] is implemented for the closed set of supported shapes:
//!
//! | Rust value | SQL |
//! |------------|-----|
//! | `str`, `String`, `Cow<str>`, `char` | STRING |
//! | `bytes::Bytes`, `BytesMut`, [`Value::Bytes`] | BYTES |
//! | `i8`..`i64`, `isize`, `u16`, `u32`, `u64`/`usize` (when in range) | INT64 |
//! | `bool` | BOOL |
//! | `f32`, `f64` | FLOAT64 |
//! | `chrono::DateTime<Tz>` | TIMESTAMP |
//! | `chrono::NaiveDate` | DATE |
//! | `Option<T>`, [`Nullable<T>`] | `NULL` or the payload |
//! | `&T`, `Box<T>`, `Rc<T>`, `Arc<T>` | the pointee |
//! | `Vec<T>`, `[T]`, `[T; N]`, `VecDeque<T>` | `ARRAY[...]` |
//! | [`Value`], `serde_json::Value` | by variant |
//!
//! `u8` has no impl. BYTES come from `bytes::Bytes` or [`Value::Bytes`],
//! so `Vec<u8>` is not a valid value.
//!
//! Any other type can take part by implementing [`ToExpr`] itself; the
//! returned expression is used verbatim.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

use crate::ast::Expr;
use crate::error::{Error, QbResult};
use crate::literal;

/// Conversion into a SQL expression.
///
/// This is also the extension point for custom types:
///
/// ```
/// use spanqb::{Expr, QbResult, ToExpr};
///
/// struct Tags(Vec<String>);
///
/// impl ToExpr for Tags {
///     fn to_expr(&self) -> QbResult<Expr> {
///         self.0.to_expr()
///     }
/// }
///
/// let tags = Tags(vec!["a".into(), "b".into()]);
/// assert_eq!(tags.to_expr().unwrap().sql(), r#"ARRAY["a", "b"]"#);
/// ```
pub trait ToExpr {
    fn to_expr(&self) -> QbResult<Expr>;
}

/// Convert any supported value into an expression.
pub fn to_expr<T: ToExpr + ?Sized>(value: &T) -> QbResult<Expr> {
    value.to_expr()
}

fn array_of<'a, T, I>(items: I) -> QbResult<Expr>
where
    T: ToExpr + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| item.to_expr().map_err(|e| e.at_index(index)))
        .collect::<QbResult<Vec<_>>>()
        .map(literal::array)
}

impl ToExpr for Expr {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(self.clone())
    }
}

// ==================== Scalars ====================

impl ToExpr for str {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::string(self))
    }
}

impl ToExpr for String {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::string(self))
    }
}

impl ToExpr for Cow<'_, str> {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::string(self))
    }
}

impl ToExpr for char {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::string(self.encode_utf8(&mut [0; 4])))
    }
}

impl ToExpr for bytes::Bytes {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::bytes(self))
    }
}

impl ToExpr for bytes::BytesMut {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::bytes(self))
    }
}

macro_rules! impl_to_expr_int {
    ($($ty:ty),*) => {
        $(
            impl ToExpr for $ty {
                fn to_expr(&self) -> QbResult<Expr> {
                    Ok(literal::int(i64::from(*self)))
                }
            }
        )*
    };
}

impl_to_expr_int!(i8, i16, i32, i64, u16, u32);

macro_rules! impl_to_expr_int_checked {
    ($($ty:ty),*) => {
        $(
            impl ToExpr for $ty {
                fn to_expr(&self) -> QbResult<Expr> {
                    i64::try_from(*self)
                        .map(literal::int)
                        .map_err(|_| Error::IntegerOutOfRange(self.to_string()))
                }
            }
        )*
    };
}

impl_to_expr_int_checked!(isize, u64, usize);

impl ToExpr for bool {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::boolean(*self))
    }
}

impl ToExpr for f64 {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::float(*self))
    }
}

impl ToExpr for f32 {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::float32(*self))
    }
}

impl<Tz: TimeZone> ToExpr for DateTime<Tz> {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::timestamp(self))
    }
}

impl ToExpr for NaiveDate {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::date(self))
    }
}

#[cfg(feature = "uuid")]
impl ToExpr for uuid::Uuid {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::string(&self.hyphenated().to_string()))
    }
}

// ==================== Nullable and pointer-like ====================

impl<T: ToExpr> ToExpr for Option<T> {
    fn to_expr(&self) -> QbResult<Expr> {
        match self {
            Some(v) => v.to_expr(),
            None => Ok(literal::null()),
        }
    }
}

/// A payload paired with a validity flag.
///
/// An invalid value renders as `NULL` whatever its payload is. This mirrors
/// the nullable column types of the Spanner client libraries; `Option<T>`
/// is the usual choice in Rust code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Nullable<T> {
    pub value: T,
    pub valid: bool,
}

impl<T> Nullable<T> {
    /// A valid (non-NULL) value.
    pub fn new(value: T) -> Self {
        Self { value, valid: true }
    }

    /// An invalid (NULL) value.
    pub fn null() -> Self
    where
        T: Default,
    {
        Self::default()
    }

    /// Whether this value is NULL.
    pub fn is_null(&self) -> bool {
        !self.valid
    }

    pub fn into_option(self) -> Option<T> {
        self.valid.then_some(self.value)
    }
}

impl<T: Default> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::new(v),
            None => Self::null(),
        }
    }
}

impl<T: ToExpr> ToExpr for Nullable<T> {
    fn to_expr(&self) -> QbResult<Expr> {
        if !self.valid {
            return Ok(literal::null());
        }
        self.value.to_expr()
    }
}

impl<T: ToExpr + ?Sized> ToExpr for &T {
    fn to_expr(&self) -> QbResult<Expr> {
        (**self).to_expr()
    }
}

impl<T: ToExpr + ?Sized> ToExpr for Box<T> {
    fn to_expr(&self) -> QbResult<Expr> {
        (**self).to_expr()
    }
}

impl<T: ToExpr + ?Sized> ToExpr for Rc<T> {
    fn to_expr(&self) -> QbResult<Expr> {
        (**self).to_expr()
    }
}

impl<T: ToExpr + ?Sized> ToExpr for Arc<T> {
    fn to_expr(&self) -> QbResult<Expr> {
        (**self).to_expr()
    }
}

// ==================== Sequences ====================

impl<T: ToExpr> ToExpr for [T] {
    fn to_expr(&self) -> QbResult<Expr> {
        array_of(self)
    }
}

impl<T: ToExpr, const N: usize> ToExpr for [T; N] {
    fn to_expr(&self) -> QbResult<Expr> {
        array_of(self)
    }
}

impl<T: ToExpr> ToExpr for Vec<T> {
    fn to_expr(&self) -> QbResult<Expr> {
        array_of(self)
    }
}

impl<T: ToExpr> ToExpr for VecDeque<T> {
    fn to_expr(&self) -> QbResult<Expr> {
        array_of(self)
    }
}

// ==================== Dynamic values ====================

/// A dynamically typed SQL value.
///
/// `Vec<Value>` holds values of mixed types, e.g. one INSERT row built at
/// runtime. Tuples are the static alternative.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Bytes(Vec<u8>),
    Int64(i64),
    Bool(bool),
    Float64(f64),
    Timestamp(DateTime<FixedOffset>),
    Date(NaiveDate),
    Array(Vec<Value>),
    /// A prebuilt expression, e.g. a query parameter.
    Expr(Expr),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::String(_) => "STRING",
            Value::Bytes(_) => "BYTES",
            Value::Int64(_) => "INT64",
            Value::Bool(_) => "BOOL",
            Value::Float64(_) => "FLOAT64",
            Value::Timestamp(_) => "TIMESTAMP",
            Value::Date(_) => "DATE",
            Value::Array(_) => "ARRAY",
            Value::Expr(_) => "expression",
        }
    }
}

impl ToExpr for Value {
    fn to_expr(&self) -> QbResult<Expr> {
        match self {
            Value::Null => Ok(literal::null()),
            Value::String(v) => Ok(literal::string(v)),
            Value::Bytes(v) => Ok(literal::bytes(v)),
            Value::Int64(v) => Ok(literal::int(*v)),
            Value::Bool(v) => Ok(literal::boolean(*v)),
            Value::Float64(v) => Ok(literal::float(*v)),
            Value::Timestamp(v) => Ok(literal::timestamp(v)),
            Value::Date(v) => Ok(literal::date(v)),
            Value::Array(items) => array_of(items),
            Value::Expr(expr) => Ok(expr.clone()),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<bytes::Bytes> for Value {
    fn from(v: bytes::Bytes) -> Self {
        Value::Bytes(v.to_vec())
    }
}

macro_rules! impl_value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int64(i64::from(v))
                }
            }
        )*
    };
}

impl_value_from_int!(i8, i16, i32, i64, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        Value::Timestamp(v.fixed_offset())
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Expr> for Value {
    fn from(v: Expr) -> Self {
        Value::Expr(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// JSON values are treated as dynamic values: arrays become ARRAY literals,
/// numbers INT64 or FLOAT64. Objects have no literal form.
impl ToExpr for serde_json::Value {
    fn to_expr(&self) -> QbResult<Expr> {
        use serde_json::Value as Json;

        match self {
            Json::Null => Ok(literal::null()),
            Json::Bool(v) => Ok(literal::boolean(*v)),
            Json::Number(n) => json_number(n),
            Json::String(v) => Ok(literal::string(v)),
            Json::Array(items) => array_of(items),
            Json::Object(_) => Err(Error::unsupported_type("JSON object")),
        }
    }
}

fn json_number(n: &serde_json::Number) -> QbResult<Expr> {
    if let Some(v) = n.as_i64() {
        return Ok(literal::int(v));
    }
    if n.is_u64() {
        return Err(Error::IntegerOutOfRange(n.to_string()));
    }
    n.as_f64()
        .map(literal::float)
        .ok_or_else(|| Error::unsupported_type(format!("JSON number {n}")))
}
