//! DELETE query builder.

use crate::ast::{self, BinaryOp};
use crate::condition::{Cond, Condition, DynCondition, fold};
use crate::error::{Error, QbResult};
use crate::qb::{Statement, StatementKind};

/// DELETE query builder.
///
/// A DELETE without conditions is rejected rather than deleting every row.
#[derive(Clone, Debug)]
pub struct Delete {
    /// Target table
    table: String,
    /// WHERE conditions, joined with AND
    conditions: Vec<Cond>,
}

impl Delete {
    /// Create a new DELETE builder.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
        }
    }

    /// Add a WHERE condition. Repeated calls are joined with AND.
    pub fn and_where<C: Condition + Send + Sync + 'static>(&self, cond: C) -> Self {
        let mut next = self.clone();
        next.conditions.push(Cond::Custom(DynCondition::new(cond)));
        next
    }

    /// Add several WHERE conditions at once.
    pub fn and_where_all(&self, conds: impl IntoIterator<Item = Cond>) -> Self {
        let mut next = self.clone();
        next.conditions.extend(conds);
        next
    }

    /// Validate and convert into a syntax tree.
    pub fn to_ast(&self) -> QbResult<ast::Delete> {
        if self.conditions.is_empty() {
            return Err(Error::validation("DELETE requires a WHERE condition"));
        }
        Ok(ast::Delete {
            table: self.table.clone(),
            filter: fold(BinaryOp::And, &self.conditions)?,
        })
    }

    /// Render as SQL text.
    pub fn to_sql(&self) -> QbResult<String> {
        Statement::to_sql(self)
    }
}

impl Statement for Delete {
    type Ast = ast::Delete;

    const KIND: StatementKind = StatementKind::Delete;

    fn to_ast(&self) -> QbResult<ast::Delete> {
        Delete::to_ast(self)
    }
}
