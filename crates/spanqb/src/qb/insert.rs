//! INSERT query builder.

use std::fmt;
use std::sync::Arc;

use crate::ast;
use crate::error::{Error, QbResult};
use crate::qb::{Statement, StatementKind};
use crate::row::ToRow;

/// A clone-friendly row wrapper.
#[derive(Clone)]
struct RowValue(Arc<dyn ToRow + Send + Sync>);

impl fmt::Debug for RowValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RowValue").field(&"<dyn ToRow>").finish()
    }
}

/// INSERT query builder.
///
/// Rows can be tuples, `Vec`s of values, [`Value`](crate::Value) arrays,
/// JSON arrays or objects, or any `#[derive(ToRow)]` struct.
#[derive(Clone, Debug)]
pub struct Insert {
    /// Target table
    table: String,
    /// Column list, in VALUES order
    columns: Vec<String>,
    /// Rows; `None` until `values` or `row` is called
    rows: Option<Vec<RowValue>>,
}

impl Insert {
    /// Create a new INSERT builder.
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: None,
        }
    }

    /// Set the rows to insert, replacing any previous rows.
    pub fn values<I, R>(&self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: ToRow + Send + Sync + 'static,
    {
        let mut next = self.clone();
        next.rows = Some(
            rows.into_iter()
                .map(|row| RowValue(Arc::new(row)))
                .collect(),
        );
        next
    }

    /// Append one row.
    pub fn row<R: ToRow + Send + Sync + 'static>(&self, row: R) -> Self {
        let mut next = self.clone();
        next.rows
            .get_or_insert_with(Vec::new)
            .push(RowValue(Arc::new(row)));
        next
    }

    /// Validate and convert into a syntax tree.
    pub fn to_ast(&self) -> QbResult<ast::Insert> {
        if self.columns.is_empty() {
            return Err(Error::validation("INSERT requires at least one column"));
        }
        let Some(rows) = &self.rows else {
            return Err(Error::validation("INSERT requires VALUES"));
        };
        if rows.is_empty() {
            return Err(Error::validation("INSERT requires at least one row"));
        }

        let rows = rows
            .iter()
            .enumerate()
            .map(|(index, row)| row.0.to_row(&self.columns).map_err(|e| e.in_row(index)))
            .collect::<QbResult<Vec<_>>>()?;

        Ok(ast::Insert {
            table: self.table.clone(),
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Render as SQL text.
    pub fn to_sql(&self) -> QbResult<String> {
        Statement::to_sql(self)
    }
}

impl Statement for Insert {
    type Ast = ast::Insert;

    const KIND: StatementKind = StatementKind::Insert;

    fn to_ast(&self) -> QbResult<ast::Insert> {
        Insert::to_ast(self)
    }
}
