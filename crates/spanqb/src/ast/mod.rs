//! GoogleSQL syntax tree and its text serializer.
//!
//! Nodes in this module are plain data. Each node renders itself with
//! [`Expr::sql`] (or `Display`) into Cloud Spanner SQL:
//!
//! - STRING literals are double-quoted with backslash escapes
//! - BYTES literals use the `B"..."` form with `\xHH` for non-printable bytes
//! - identifiers are backtick-quoted when reserved or not `[A-Za-z_][A-Za-z0-9_]*`
//! - keywords are always upper case
//!
//! Nodes are normally produced by the literal renderer, the value dispatcher
//! and the statement builders rather than by hand.

mod quote;

pub use quote::{
    is_plain_ident, is_reserved_keyword, quote_bytes, quote_ident, quote_string,
};

use std::fmt;

/// Binary operators usable in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Like,
    NotLike,
    And,
    Or,
}

impl BinaryOp {
    /// SQL spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }

    /// Whether this is `AND` or `OR`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Right-hand side of an IN expression.
#[derive(Debug, Clone, PartialEq)]
pub enum InCandidates {
    /// `(a, b, c)`
    Values(Vec<Expr>),
    /// `UNNEST(expr)`
    Unnest(Box<Expr>),
    /// `(SELECT ...)`
    Subquery(Box<Select>),
}

/// A value-producing SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Null,
    String(String),
    Bytes(Vec<u8>),
    /// Base-10 integer text.
    Int(String),
    Bool(bool),
    /// Float text (`1e+00`, `NaN`, `+Inf`, ...).
    Float(String),
    /// RFC 3339 timestamp text.
    Timestamp(String),
    /// `YYYY-MM-DD` text.
    Date(String),
    Array(Vec<Expr>),
    /// Dotted identifier path, one entry per segment.
    Ident(Vec<String>),
    /// Named query parameter, rendered as `@name`.
    Param(String),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    IsNull {
        expr: Box<Expr>,
        not: bool,
    },
    In {
        expr: Box<Expr>,
        candidates: InCandidates,
        not: bool,
    },
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        not: bool,
    },
    ScalarSubquery(Box<Select>),
    ArraySubquery(Box<Select>),
    Paren(Box<Expr>),
}

impl Expr {
    /// Build a binary expression.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Build a single-segment identifier.
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(vec![name.into()])
    }

    /// The operator at the top of this expression, if it is a binary one.
    pub fn top_operator(&self) -> Option<BinaryOp> {
        match self {
            Expr::Binary { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Render this expression as SQL text.
    pub fn sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    /// Append the SQL text of this expression to `out`.
    pub fn write_sql(&self, out: &mut String) {
        match self {
            Expr::Null => out.push_str("NULL"),
            Expr::String(v) => quote::push_string(out, v),
            Expr::Bytes(v) => quote::push_bytes(out, v),
            Expr::Int(v) | Expr::Float(v) => out.push_str(v),
            Expr::Bool(true) => out.push_str("TRUE"),
            Expr::Bool(false) => out.push_str("FALSE"),
            Expr::Timestamp(v) => {
                out.push_str("TIMESTAMP ");
                quote::push_string(out, v);
            }
            Expr::Date(v) => {
                out.push_str("DATE ");
                quote::push_string(out, v);
            }
            Expr::Array(values) => {
                out.push_str("ARRAY[");
                write_list(out, values);
                out.push(']');
            }
            Expr::Ident(path) => write_path(out, path),
            Expr::Param(name) => {
                out.push('@');
                out.push_str(name);
            }
            Expr::Binary { op, left, right } => {
                left.write_sql(out);
                out.push(' ');
                out.push_str(op.as_str());
                out.push(' ');
                right.write_sql(out);
            }
            Expr::IsNull { expr, not } => {
                expr.write_sql(out);
                out.push_str(if *not { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::In {
                expr,
                candidates,
                not,
            } => {
                expr.write_sql(out);
                out.push_str(if *not { " NOT IN " } else { " IN " });
                match candidates {
                    InCandidates::Values(values) => {
                        out.push('(');
                        write_list(out, values);
                        out.push(')');
                    }
                    InCandidates::Unnest(array) => {
                        out.push_str("UNNEST(");
                        array.write_sql(out);
                        out.push(')');
                    }
                    InCandidates::Subquery(query) => {
                        out.push('(');
                        query.write_sql(out);
                        out.push(')');
                    }
                }
            }
            Expr::Between {
                expr,
                low,
                high,
                not,
            } => {
                expr.write_sql(out);
                out.push_str(if *not { " NOT BETWEEN " } else { " BETWEEN " });
                low.write_sql(out);
                out.push_str(" AND ");
                high.write_sql(out);
            }
            Expr::ScalarSubquery(query) => {
                out.push('(');
                query.write_sql(out);
                out.push(')');
            }
            Expr::ArraySubquery(query) => {
                out.push_str("ARRAY(");
                query.write_sql(out);
                out.push(')');
            }
            Expr::Paren(inner) => {
                out.push('(');
                inner.write_sql(out);
                out.push(')');
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql())
    }
}

/// One projected item of a SELECT list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    Expr(Expr),
    Alias { expr: Expr, alias: String },
}

impl SelectItem {
    fn write_sql(&self, out: &mut String) {
        match self {
            SelectItem::Expr(expr) => expr.write_sql(out),
            SelectItem::Alias { expr, alias } => {
                expr.write_sql(out);
                out.push_str(" AS ");
                quote::push_ident(out, alias);
            }
        }
    }
}

/// One ORDER BY key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expr: Expr,
    pub direction: Option<Direction>,
}

/// LIMIT with an optional OFFSET.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub count: Expr,
    pub offset: Option<Expr>,
}

/// `SELECT ... FROM ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub items: Vec<SelectItem>,
    pub from: String,
    pub filter: Option<Expr>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<Limit>,
}

impl Select {
    pub fn sql(&self) -> String {
        let mut out = String::new();
        self.write_sql(&mut out);
        out
    }

    pub fn write_sql(&self, out: &mut String) {
        out.push_str("SELECT ");
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            item.write_sql(out);
        }
        out.push_str(" FROM ");
        quote::push_ident(out, &self.from);
        if let Some(filter) = &self.filter {
            out.push_str(" WHERE ");
            filter.write_sql(out);
        }
        if !self.order_by.is_empty() {
            out.push_str(" ORDER BY ");
            for (i, item) in self.order_by.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                item.expr.write_sql(out);
                if let Some(direction) = item.direction {
                    out.push(' ');
                    out.push_str(direction.as_str());
                }
            }
        }
        if let Some(limit) = &self.limit {
            out.push_str(" LIMIT ");
            limit.count.write_sql(out);
            if let Some(offset) = &limit.offset {
                out.push_str(" OFFSET ");
                offset.write_sql(out);
            }
        }
    }
}

/// `INSERT INTO ... (...) VALUES (...), ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Expr>>,
}

impl Insert {
    pub fn sql(&self) -> String {
        let mut out = String::new();
        out.push_str("INSERT INTO ");
        quote::push_ident(&mut out, &self.table);
        out.push_str(" (");
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            quote::push_ident(&mut out, column);
        }
        out.push_str(") VALUES ");
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push('(');
            write_list(&mut out, row);
            out.push(')');
        }
        out
    }
}

/// One `path = value` item of an UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub struct SetItem {
    pub path: Vec<String>,
    pub value: Expr,
}

/// `UPDATE ... SET ... WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub items: Vec<SetItem>,
    pub filter: Expr,
}

impl Update {
    pub fn sql(&self) -> String {
        let mut out = String::new();
        out.push_str("UPDATE ");
        quote::push_ident(&mut out, &self.table);
        out.push_str(" SET ");
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_path(&mut out, &item.path);
            out.push_str(" = ");
            item.value.write_sql(&mut out);
        }
        out.push_str(" WHERE ");
        self.filter.write_sql(&mut out);
        out
    }
}

/// `DELETE FROM ... WHERE ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub filter: Expr,
}

impl Delete {
    pub fn sql(&self) -> String {
        let mut out = String::new();
        out.push_str("DELETE FROM ");
        quote::push_ident(&mut out, &self.table);
        out.push_str(" WHERE ");
        self.filter.write_sql(&mut out);
        out
    }
}

macro_rules! impl_display_via_sql {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.sql())
                }
            }
        )*
    };
}

impl_display_via_sql!(Select, Insert, Update, Delete);

fn write_list(out: &mut String, values: &[Expr]) {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        value.write_sql(out);
    }
}

fn write_path(out: &mut String, path: &[String]) {
    for (i, segment) in path.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        quote::push_ident(out, segment);
    }
}
