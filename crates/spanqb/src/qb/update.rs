//! UPDATE query builder.

use crate::ast::{self, BinaryOp, SetItem};
use crate::condition::{Cond, Condition, DynCondition, fold};
use crate::error::{Error, QbResult};
use crate::operand::{Ident, Operand};
use crate::qb::{Statement, StatementKind};
use crate::value::ToExpr;

/// UPDATE query builder.
#[derive(Clone, Debug)]
pub struct Update {
    /// Target table
    table: String,
    /// SET items, in call order
    items: Vec<(Ident, Operand)>,
    /// WHERE conditions, joined with AND
    conditions: Vec<Cond>,
}

impl Update {
    /// Create a new UPDATE builder.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            items: Vec::new(),
            conditions: Vec::new(),
        }
    }

    /// Add `column = value` to the SET list.
    ///
    /// `column` is a column name or an [`Ident`] path.
    pub fn set<T: ToExpr + Send + Sync + 'static>(&self, column: impl Into<Ident>, value: T) -> Self {
        let mut next = self.clone();
        next.items.push((column.into(), Operand::new(value)));
        next
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
    pub fn to_ast(&self) -> QbResult<ast::Update> {
        if self.items.is_empty() {
            return Err(Error::validation("UPDATE requires at least one SET item"));
        }
        if self.conditions.is_empty() {
            return Err(Error::validation("UPDATE requires a WHERE condition"));
        }

        let items = self
            .items
            .iter()
            .map(|(column, value)| {
                if column.segments().is_empty() {
                    return Err(Error::EmptyIdentifier);
                }
                Ok(SetItem {
                    path: column.segments().to_vec(),
                    value: value.to_expr()?,
                })
            })
            .collect::<QbResult<Vec<_>>>()?;

        Ok(ast::Update {
            table: self.table.clone(),
            items,
            filter: fold(BinaryOp::And, &self.conditions)?,
        })
    }

    /// Render as SQL text.
    pub fn to_sql(&self) -> QbResult<String> {
        Statement::to_sql(self)
    }
}

impl Statement for Update {
    type Ast = ast::Update;

    const KIND: StatementKind = StatementKind::Update;

    fn to_ast(&self) -> QbResult<ast::Update> {
        Update::to_ast(self)
    }
}
