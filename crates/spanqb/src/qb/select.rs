//! SELECT query builder.

use crate::ast::{self, BinaryOp, Direction, Expr, Limit, OrderItem, SelectItem};
use crate::condition::{Cond, Condition, DynCondition, fold};
use crate::error::{Error, QbResult};
use crate::literal;
use crate::qb::subquery::Subquery;
use crate::qb::{Statement, StatementKind};

/// SELECT query builder.
#[derive(Clone, Debug)]
pub struct Select {
    /// FROM table
    table: String,
    /// Plain projected columns
    columns: Vec<String>,
    /// Projected subqueries, rendered after the plain columns
    subqueries: Vec<Subquery>,
    /// WHERE conditions, joined with AND
    conditions: Vec<Cond>,
    /// ORDER BY keys
    order_by: Vec<(String, Direction)>,
    /// LIMIT count and optional OFFSET
    limit: Option<(i64, Option<i64>)>,
}

impl Select {
    /// Create a new SELECT builder.
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            subqueries: Vec::new(),
            conditions: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    // ==================== WHERE conditions ====================

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

    // ==================== Projection ====================

    /// Project a subquery after the plain columns.
    pub fn subquery(&self, query: impl Into<Subquery>) -> Self {
        let mut next = self.clone();
        next.subqueries.push(query.into());
        next
    }

    // ==================== ORDER BY / LIMIT ====================

    /// Add an ORDER BY key.
    pub fn order_by(&self, column: impl Into<String>, direction: Direction) -> Self {
        let mut next = self.clone();
        next.order_by.push((column.into(), direction));
        next
    }

    /// Set LIMIT, replacing any previous LIMIT/OFFSET.
    pub fn limit(&self, count: i64) -> Self {
        let mut next = self.clone();
        next.limit = Some((count, None));
        next
    }

    /// Set LIMIT and OFFSET, replacing any previous LIMIT/OFFSET.
    pub fn limit_offset(&self, count: i64, offset: i64) -> Self {
        let mut next = self.clone();
        next.limit = Some((count, Some(offset)));
        next
    }

    // ==================== Rendering ====================

    /// Validate and convert into a syntax tree.
    pub fn to_ast(&self) -> QbResult<ast::Select> {
        if self.columns.is_empty() {
            return Err(Error::validation("SELECT requires at least one column"));
        }

        let mut items: Vec<SelectItem> = self
            .columns
            .iter()
            .map(|column| SelectItem::Expr(Expr::ident(column.as_str())))
            .collect();
        for subquery in &self.subqueries {
            items.push(subquery.to_select_item()?);
        }

        let filter = if self.conditions.is_empty() {
            None
        } else {
            Some(fold(BinaryOp::And, &self.conditions)?)
        };

        let order_by = self
            .order_by
            .iter()
            .map(|(column, direction)| OrderItem {
                expr: Expr::ident(column.as_str()),
                direction: Some(*direction),
            })
            .collect();

        let limit = self.limit.map(|(count, offset)| Limit {
            count: literal::int(count),
            offset: offset.map(literal::int),
        });

        Ok(ast::Select {
            items,
            from: self.table.clone(),
            filter,
            order_by,
            limit,
        })
    }

    /// Render as SQL text.
    pub fn to_sql(&self) -> QbResult<String> {
        Statement::to_sql(self)
    }
}

impl Statement for Select {
    type Ast = ast::Select;

    const KIND: StatementKind = StatementKind::Select;

    fn to_ast(&self) -> QbResult<ast::Select> {
        Select::to_ast(self)
    }
}
