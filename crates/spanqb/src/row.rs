//! Row binder: one INSERT row from a sequence or a keyed record.
//!
//! Sequences (`Vec<T>`, arrays, tuples, `Value::Array`, JSON arrays) bind
//! positionally. Records bind by column name, see [`bind_record`].

use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use crate::ast::Expr;
use crate::error::{Error, QbResult};
use crate::value::{ToExpr, Value};

/// The expressions of one VALUES row, in column order.
pub type Row = Vec<Expr>;

/// Conversion of a value into one INSERT row.
///
/// Positional rows are not checked against the column count.
pub trait ToRow {
    fn to_row(&self, columns: &[String]) -> QbResult<Row>;
}

/// Bind `value` against the declared `columns`.
pub fn to_row<R: ToRow + ?Sized>(columns: &[String], value: &R) -> QbResult<Row> {
    value.to_row(columns)
}

/// Static description of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as written in the struct.
    pub name: &'static str,
    /// Column name override from `#[spanner(column = "...")]`.
    pub column: Option<&'static str>,
    /// Set by `#[spanner(skip)]`; the field never binds.
    pub skip: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column: None,
            skip: false,
        }
    }

    pub const fn column(mut self, column: &'static str) -> Self {
        self.column = Some(column);
        self
    }

    pub const fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Whether this field binds to `column`.
    ///
    /// An override is compared exactly and replaces the field name; a plain
    /// field name is compared case-insensitively.
    pub fn matches(&self, column: &str) -> bool {
        if self.skip {
            return false;
        }
        match self.column {
            Some(name) => name == column,
            None => self.name.eq_ignore_ascii_case(column),
        }
    }
}

/// A struct whose fields bind to columns by name.
///
/// Usually implemented with `#[derive(ToRow)]`, which also implements
/// [`ToRow`] in terms of [`bind_record`].
pub trait Record {
    /// Type name used in `ColumnNotFound` errors.
    const TYPE_NAME: &'static str;

    /// Fields in declaration order.
    fn fields() -> &'static [FieldSpec];

    /// Expression for the field at `index` in [`Record::fields`].
    fn field_expr(&self, index: usize) -> QbResult<Expr>;
}

/// Resolve each column to a field of `record` and convert it.
///
/// Columns are resolved in order, so the first column without a field is
/// the one reported.
pub fn bind_record<R: Record>(record: &R, columns: &[String]) -> QbResult<Row> {
    let fields = R::fields();
    columns
        .iter()
        .map(|column| {
            let index = fields
                .iter()
                .position(|field| field.column.is_some() && field.matches(column))
                .or_else(|| fields.iter().position(|field| field.matches(column)))
                .ok_or_else(|| Error::column_not_found(R::TYPE_NAME, column.as_str()))?;
            record.field_expr(index)
        })
        .collect()
}

fn positional<'a, T, I>(items: I) -> QbResult<Row>
where
    T: ToExpr + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(ToExpr::to_expr).collect()
}

impl<T: ToExpr> ToRow for [T] {
    fn to_row(&self, _columns: &[String]) -> QbResult<Row> {
        positional(self)
    }
}

impl<T: ToExpr, const N: usize> ToRow for [T; N] {
    fn to_row(&self, _columns: &[String]) -> QbResult<Row> {
        positional(self)
    }
}

impl<T: ToExpr> ToRow for Vec<T> {
    fn to_row(&self, _columns: &[String]) -> QbResult<Row> {
        positional(self)
    }
}

impl<T: ToExpr> ToRow for VecDeque<T> {
    fn to_row(&self, _columns: &[String]) -> QbResult<Row> {
        positional(self)
    }
}

impl<R: ToRow + ?Sized> ToRow for &R {
    fn to_row(&self, columns: &[String]) -> QbResult<Row> {
        (**self).to_row(columns)
    }
}

impl<R: ToRow + ?Sized> ToRow for Box<R> {
    fn to_row(&self, columns: &[String]) -> QbResult<Row> {
        (**self).to_row(columns)
    }
}

impl<R: ToRow + ?Sized> ToRow for Rc<R> {
    fn to_row(&self, columns: &[String]) -> QbResult<Row> {
        (**self).to_row(columns)
    }
}

impl<R: ToRow + ?Sized> ToRow for Arc<R> {
    fn to_row(&self, columns: &[String]) -> QbResult<Row> {
        (**self).to_row(columns)
    }
}

macro_rules! impl_to_row_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: ToExpr),+> ToRow for ($($name,)+) {
            fn to_row(&self, _columns: &[String]) -> QbResult<Row> {
                Ok(vec![$(self.$idx.to_expr()?),+])
            }
        }
    };
}

impl_to_row_tuple!(A: 0);
impl_to_row_tuple!(A: 0, B: 1);
impl_to_row_tuple!(A: 0, B: 1, C: 2);
impl_to_row_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_to_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_to_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_to_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_to_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
impl_to_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8);
impl_to_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9);
impl_to_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10);
impl_to_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11);

impl ToRow for Value {
    fn to_row(&self, _columns: &[String]) -> QbResult<Row> {
        match self {
            Value::Array(items) => positional(items),
            other => Err(Error::UnsupportedRowShape(format!("{} value", other.kind()))),
        }
    }
}

impl ToRow for serde_json::Value {
    fn to_row(&self, columns: &[String]) -> QbResult<Row> {
        use serde_json::Value as Json;

        match self {
            Json::Array(items) => positional(items),
            Json::Object(map) => columns
                .iter()
                .map(|column| {
                    map.get(column)
                        .or_else(|| {
                            map.iter()
                                .find(|(key, _)| key.eq_ignore_ascii_case(column))
                                .map(|(_, value)| value)
                        })
                        .ok_or_else(|| Error::column_not_found("JSON object", column.as_str()))?
                        .to_expr()
                })
                .collect(),
            _ => Err(Error::UnsupportedRowShape("JSON scalar".to_string())),
        }
    }
}
