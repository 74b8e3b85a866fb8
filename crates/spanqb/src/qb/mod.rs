//! Statement builders for SELECT, INSERT, UPDATE and DELETE.
//!
//! Every builder method takes `&self` and returns a new builder, so a
//! partially built statement can be kept as a base and branched freely:
//!
//! ```
//! use spanqb::prelude::*;
//!
//! # fn main() -> QbResult<()> {
//! let base = select("user", ["name", "created_at"]);
//! let active = base.and_where(eq(ident("active"), true));
//! let recent = base.order_by("created_at", Direction::Desc).limit(10);
//!
//! assert_eq!(
//!     recent.to_sql()?,
//!     "SELECT name, created_at FROM user ORDER BY created_at DESC LIMIT 10",
//! );
//! assert_eq!(
//!     active.to_sql()?,
//!     "SELECT name, created_at FROM user WHERE active = TRUE",
//! );
//!
//! let sql = insert("user", ["name", "age"])
//!     .values([("alice", 30), ("bob", 25)])
//!     .to_sql()?;
//! assert_eq!(sql, r#"INSERT INTO user (name, age) VALUES ("alice", 30), ("bob", 25)"#);
//!
//! let sql = update("user")
//!     .set("age", param("age"))
//!     .and_where(eq(ident("name"), "alice"))
//!     .to_sql()?;
//! assert_eq!(sql, r#"UPDATE user SET age = @age WHERE name = "alice""#);
//! # Ok(())
//! # }
//! ```
//!
//! Nothing is converted until [`Statement::to_ast`] (or `to_sql`) runs.
//! Structural checks (columns, rows, SET, WHERE) come first; value
//! conversion errors are reported only for statements that pass them.

mod delete;
mod insert;
mod select;
mod subquery;
mod update;

use std::fmt;

pub use delete::Delete;
pub use insert::Insert;
pub use select::Select;
pub use subquery::{ArraySubquery, ScalarSubquery, Subquery};
pub use update::Update;

use crate::error::QbResult;

/// The kind of SQL statement a builder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common interface of the statement builders.
pub trait Statement {
    /// Syntax tree produced by this builder.
    type Ast: fmt::Display;

    const KIND: StatementKind;

    /// Validate the builder and convert every value.
    fn to_ast(&self) -> QbResult<Self::Ast>;

    /// Render the statement as SQL text.
    fn to_sql(&self) -> QbResult<String> {
        let result = self.to_ast().map(|ast| ast.to_string());
        trace_render(Self::KIND, &result);
        result
    }
}

/// Create a SELECT builder.
///
/// # Example
/// ```
/// use spanqb::{eq, ident};
///
/// let qb = spanqb::select("user", ["name"]).and_where(eq(ident("id"), 1));
/// assert_eq!(qb.to_sql().unwrap(), "SELECT name FROM user WHERE id = 1");
/// ```
pub fn select<I, S>(table: impl Into<String>, columns: I) -> Select
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Select::new(table, columns)
}

/// Create an INSERT builder. Rows are added with `values` or `row`.
pub fn insert<I, S>(table: impl Into<String>, columns: I) -> Insert
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Insert::new(table, columns)
}

/// Create an UPDATE builder.
///
/// An UPDATE needs at least one `set` and one `and_where`.
pub fn update(table: impl Into<String>) -> Update {
    Update::new(table)
}

/// Create a DELETE builder.
///
/// A DELETE without WHERE is rejected; use `and_where(boolean(true))` to
/// delete every row.
pub fn delete(table: impl Into<String>) -> Delete {
    Delete::new(table)
}

#[cfg(feature = "tracing")]
const MAX_LOGGED_SQL: usize = 200;

#[cfg(feature = "tracing")]
fn trace_render(kind: StatementKind, result: &QbResult<String>) {
    match result {
        Ok(sql) => tracing::debug!(
            target: "spanqb.sql",
            statement = kind.as_str(),
            sql = %truncate_sql(sql, MAX_LOGGED_SQL),
        ),
        Err(err) => tracing::debug!(
            target: "spanqb.sql",
            statement = kind.as_str(),
            error = %err,
            "statement rejected",
        ),
    }
}

#[cfg(not(feature = "tracing"))]
fn trace_render(_kind: StatementKind, _result: &QbResult<String>) {}

#[cfg(feature = "tracing")]
fn truncate_sql(sql: &str, max_bytes: usize) -> String {
    if sql.len() <= max_bytes {
        return sql.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &sql[..end])
}

#[cfg(test)]
mod tests;
