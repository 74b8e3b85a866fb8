//! Condition algebra for WHERE clauses.
//!
//! [`Cond`] is a tree of boolean conditions. Leaves hold unconverted
//! [`Operand`]s; nothing is converted until [`Condition::to_condition`]
//! runs, and the first operand error is returned unchanged.
//!
//! ```
//! use spanqb::prelude::*;
//!
//! # fn main() -> QbResult<()> {
//! let cond = and([
//!     eq(ident("a"), 1),
//!     or([is_null(ident("b")), like(ident("c"), "x%")]),
//! ]);
//! assert_eq!(
//!     cond.to_condition()?.sql(),
//!     r#"a = 1 AND (b IS NULL OR c LIKE "x%")"#,
//! );
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::ast::{BinaryOp, Expr, InCandidates};
use crate::error::{Error, QbResult};
use crate::operand::Operand;
use crate::qb::Select;
use crate::value::ToExpr;

/// Anything that produces a boolean expression for a WHERE clause.
pub trait Condition {
    fn to_condition(&self) -> QbResult<Expr>;
}

/// A prebuilt expression is used as-is.
impl Condition for Expr {
    fn to_condition(&self) -> QbResult<Expr> {
        Ok(self.clone())
    }
}

impl<C: Condition + ?Sized> Condition for &C {
    fn to_condition(&self) -> QbResult<Expr> {
        (**self).to_condition()
    }
}

impl<C: Condition + ?Sized> Condition for Box<C> {
    fn to_condition(&self) -> QbResult<Expr> {
        (**self).to_condition()
    }
}

impl<C: Condition + ?Sized> Condition for Arc<C> {
    fn to_condition(&self) -> QbResult<Expr> {
        (**self).to_condition()
    }
}

/// A shared, type-erased condition.
#[derive(Clone)]
pub struct DynCondition(Arc<dyn Condition + Send + Sync>);

impl DynCondition {
    pub fn new<C: Condition + Send + Sync + 'static>(cond: C) -> Self {
        DynCondition(Arc::new(cond))
    }
}

impl Condition for DynCondition {
    fn to_condition(&self) -> QbResult<Expr> {
        self.0.to_condition()
    }
}

impl fmt::Debug for DynCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DynCondition")
            .field(&"<dyn Condition>")
            .finish()
    }
}

/// Condition tree node.
#[derive(Clone, Debug)]
pub enum Cond {
    /// AND group, folded left to right.
    And(Vec<Cond>),

    /// OR group, folded left to right.
    Or(Vec<Cond>),

    /// `lhs op rhs`
    Compare {
        lhs: Operand,
        op: BinaryOp,
        rhs: Operand,
    },

    /// `operand IS [NOT] NULL`
    NullCheck { operand: Operand, negated: bool },

    /// `operand [NOT] IN UNNEST(array)`
    InUnnest {
        operand: Operand,
        array: Operand,
        negated: bool,
    },

    /// `operand [NOT] IN (v1, v2, ...)`
    InList {
        operand: Operand,
        values: Vec<Operand>,
        negated: bool,
    },

    /// `operand [NOT] IN (SELECT ...)`
    InSubquery {
        operand: Operand,
        query: Box<Select>,
        negated: bool,
    },

    /// `operand [NOT] BETWEEN low AND high`
    Between {
        operand: Operand,
        low: Operand,
        high: Operand,
        negated: bool,
    },

    /// `TRUE` / `FALSE`
    Bool(bool),

    /// Any other condition.
    Custom(DynCondition),
}

impl Cond {
    /// Wrap a custom condition.
    pub fn custom<C: Condition + Send + Sync + 'static>(cond: C) -> Self {
        Cond::Custom(DynCondition::new(cond))
    }
}

impl From<Expr> for Cond {
    fn from(expr: Expr) -> Self {
        Cond::custom(expr)
    }
}

impl From<DynCondition> for Cond {
    fn from(cond: DynCondition) -> Self {
        Cond::Custom(cond)
    }
}

impl Condition for Cond {
    fn to_condition(&self) -> QbResult<Expr> {
        match self {
            Cond::And(conds) => fold(BinaryOp::And, conds),
            Cond::Or(conds) => fold(BinaryOp::Or, conds),
            Cond::Compare { lhs, op, rhs } => {
                let left = lhs.to_expr()?;
                let right = rhs.to_expr()?;
                Ok(Expr::binary(*op, left, right))
            }
            Cond::NullCheck { operand, negated } => Ok(Expr::IsNull {
                expr: Box::new(operand.to_expr()?),
                not: *negated,
            }),
            Cond::InUnnest {
                operand,
                array,
                negated,
            } => {
                let expr = operand.to_expr()?;
                let array = array.to_expr()?;
                Ok(Expr::In {
                    expr: Box::new(expr),
                    candidates: InCandidates::Unnest(Box::new(array)),
                    not: *negated,
                })
            }
            Cond::InList {
                operand,
                values,
                negated,
            } => {
                let expr = operand.to_expr()?;
                // `x IN ()` is not valid SQL
                if values.is_empty() {
                    return Ok(Expr::Bool(*negated));
                }
                let values = values
                    .iter()
                    .map(ToExpr::to_expr)
                    .collect::<QbResult<Vec<_>>>()?;
                Ok(Expr::In {
                    expr: Box::new(expr),
                    candidates: InCandidates::Values(values),
                    not: *negated,
                })
            }
            Cond::InSubquery {
                operand,
                query,
                negated,
            } => {
                let expr = operand.to_expr()?;
                let query = query.to_ast()?;
                Ok(Expr::In {
                    expr: Box::new(expr),
                    candidates: InCandidates::Subquery(Box::new(query)),
                    not: *negated,
                })
            }
            Cond::Between {
                operand,
                low,
                high,
                negated,
            } => {
                let expr = operand.to_expr()?;
                let low = low.to_expr()?;
                let high = high.to_expr()?;
                Ok(Expr::Between {
                    expr: Box::new(expr),
                    low: Box::new(low),
                    high: Box::new(high),
                    not: *negated,
                })
            }
            Cond::Bool(v) => Ok(Expr::Bool(*v)),
            Cond::Custom(cond) => cond.to_condition(),
        }
    }
}

/// Left-fold `conds` with `op`.
///
/// A child whose top operator is the other logical operator is wrapped in
/// parentheses; same-operator chains stay flat.
pub(crate) fn fold<C: Condition>(op: BinaryOp, conds: &[C]) -> QbResult<Expr> {
    let mut iter = conds.iter();
    let Some(first) = iter.next() else {
        return Err(Error::EmptyConditionList(op.as_str()));
    };
    let first = first.to_condition()?;
    if conds.len() == 1 {
        return Ok(first);
    }
    let mut acc = group(op, first);
    for cond in iter {
        let next = group(op, cond.to_condition()?);
        acc = Expr::binary(op, acc, next);
    }
    Ok(acc)
}

fn group(op: BinaryOp, expr: Expr) -> Expr {
    match expr.top_operator() {
        Some(inner) if inner.is_logical() && inner != op => Expr::Paren(Box::new(expr)),
        _ => expr,
    }
}

// ==================== Constructors ====================

/// `lhs op rhs` for any binary operator.
pub fn op<L, R>(lhs: L, op: BinaryOp, rhs: R) -> Cond
where
    L: ToExpr + Send + Sync + 'static,
    R: ToExpr + Send + Sync + 'static,
{
    Cond::Compare {
        lhs: Operand::new(lhs),
        op,
        rhs: Operand::new(rhs),
    }
}

macro_rules! binary_constructors {
    ($($(#[$doc:meta])* $name:ident => $op:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name<L, R>(lhs: L, rhs: R) -> Cond
            where
                L: ToExpr + Send + Sync + 'static,
                R: ToExpr + Send + Sync + 'static,
            {
                op(lhs, BinaryOp::$op, rhs)
            }
        )*
    };
}

binary_constructors! {
    /// `lhs = rhs`
    eq => Equal;
    /// `lhs != rhs`
    ne => NotEqual;
    /// `lhs < rhs`
    lt => Less;
    /// `lhs > rhs`
    gt => Greater;
    /// `lhs <= rhs`
    le => LessEqual;
    /// `lhs >= rhs`
    ge => GreaterEqual;
    /// `lhs LIKE rhs`
    like => Like;
    /// `lhs NOT LIKE rhs`
    not_like => NotLike;
}

/// `operand IS NULL`
pub fn is_null<T: ToExpr + Send + Sync + 'static>(operand: T) -> Cond {
    Cond::NullCheck {
        operand: Operand::new(operand),
        negated: false,
    }
}

/// `operand IS NOT NULL`
pub fn is_not_null<T: ToExpr + Send + Sync + 'static>(operand: T) -> Cond {
    Cond::NullCheck {
        operand: Operand::new(operand),
        negated: true,
    }
}

/// `operand IN UNNEST(array)`; `array` is usually a `Vec` or a parameter.
pub fn in_<T, A>(operand: T, array: A) -> Cond
where
    T: ToExpr + Send + Sync + 'static,
    A: ToExpr + Send + Sync + 'static,
{
    Cond::InUnnest {
        operand: Operand::new(operand),
        array: Operand::new(array),
        negated: false,
    }
}

/// `operand NOT IN UNNEST(array)`
pub fn not_in<T, A>(operand: T, array: A) -> Cond
where
    T: ToExpr + Send + Sync + 'static,
    A: ToExpr + Send + Sync + 'static,
{
    Cond::InUnnest {
        operand: Operand::new(operand),
        array: Operand::new(array),
        negated: true,
    }
}

/// `operand IN (v1, v2, ...)`. An empty list is `FALSE`.
pub fn in_values<T, I, V>(operand: T, values: I) -> Cond
where
    T: ToExpr + Send + Sync + 'static,
    I: IntoIterator<Item = V>,
    V: ToExpr + Send + Sync + 'static,
{
    Cond::InList {
        operand: Operand::new(operand),
        values: values.into_iter().map(Operand::new).collect(),
        negated: false,
    }
}

/// `operand NOT IN (v1, v2, ...)`. An empty list is `TRUE`.
pub fn not_in_values<T, I, V>(operand: T, values: I) -> Cond
where
    T: ToExpr + Send + Sync + 'static,
    I: IntoIterator<Item = V>,
    V: ToExpr + Send + Sync + 'static,
{
    Cond::InList {
        operand: Operand::new(operand),
        values: values.into_iter().map(Operand::new).collect(),
        negated: true,
    }
}

/// `operand IN (SELECT ...)`
pub fn in_subquery<T: ToExpr + Send + Sync + 'static>(operand: T, query: Select) -> Cond {
    Cond::InSubquery {
        operand: Operand::new(operand),
        query: Box::new(query),
        negated: false,
    }
}

/// `operand NOT IN (SELECT ...)`
pub fn not_in_subquery<T: ToExpr + Send + Sync + 'static>(operand: T, query: Select) -> Cond {
    Cond::InSubquery {
        operand: Operand::new(operand),
        query: Box::new(query),
        negated: true,
    }
}

/// `operand BETWEEN low AND high`
pub fn between<T, L, H>(operand: T, low: L, high: H) -> Cond
where
    T: ToExpr + Send + Sync + 'static,
    L: ToExpr + Send + Sync + 'static,
    H: ToExpr + Send + Sync + 'static,
{
    Cond::Between {
        operand: Operand::new(operand),
        low: Operand::new(low),
        high: Operand::new(high),
        negated: false,
    }
}

/// `operand NOT BETWEEN low AND high`
pub fn not_between<T, L, H>(operand: T, low: L, high: H) -> Cond
where
    T: ToExpr + Send + Sync + 'static,
    L: ToExpr + Send + Sync + 'static,
    H: ToExpr + Send + Sync + 'static,
{
    Cond::Between {
        operand: Operand::new(operand),
        low: Operand::new(low),
        high: Operand::new(high),
        negated: true,
    }
}

/// `TRUE` or `FALSE`.
pub fn boolean(v: bool) -> Cond {
    Cond::Bool(v)
}

/// AND of all conditions. Fails on render when empty.
pub fn and(conds: impl IntoIterator<Item = Cond>) -> Cond {
    Cond::And(conds.into_iter().collect())
}

/// OR of all conditions. Fails on render when empty.
pub fn or(conds: impl IntoIterator<Item = Cond>) -> Cond {
    Cond::Or(conds.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operand::{ident, param};
    use crate::value::Nullable;

    fn sql(cond: impl Condition) -> String {
        cond.to_condition().unwrap().sql()
    }

    #[test]
    fn test_bool() {
        assert_eq!(sql(boolean(true)), "TRUE");
        assert_eq!(sql(boolean(false)), "FALSE");
    }

    #[test]
    fn test_op() {
        assert_eq!(sql(op(1i64, BinaryOp::Equal, 1i64)), "1 = 1");
        assert_eq!(sql(ne("hoge", "fuga")), r#""hoge" != "fuga""#);
        assert_eq!(sql(lt(1.23, 4.56)), "1.23e+00 < 4.56e+00");
        assert_eq!(sql(gt(4.56, 1.23)), "4.56e+00 > 1.23e+00");
        assert_eq!(sql(le(1, 2)), "1 <= 2");
        assert_eq!(sql(ge(2, 1)), "2 >= 1");
    }

    #[test]
    fn test_like() {
        assert_eq!(sql(like(ident("name"), "a%")), r#"name LIKE "a%""#);
        assert_eq!(sql(not_like(ident("name"), "a%")), r#"name NOT LIKE "a%""#);
    }

    #[test]
    fn test_null_checks() {
        assert_eq!(sql(is_null(ident("a"))), "a IS NULL");
        assert_eq!(sql(is_not_null(ident("a"))), "a IS NOT NULL");
        assert_eq!(sql(is_null(Nullable::<i64>::null())), "NULL IS NULL");
    }

    #[test]
    fn test_in() {
        assert_eq!(sql(in_(ident("a"), vec![1i64, 2])), "a IN UNNEST(ARRAY[1, 2])");
        assert_eq!(sql(not_in(ident("a"), param("ids"))), "a NOT IN UNNEST(@ids)");
        assert_eq!(sql(in_values(ident("a"), ["x", "y"])), r#"a IN ("x", "y")"#);
        assert_eq!(sql(not_in_values(ident("a"), [1, 2])), "a NOT IN (1, 2)");
        assert_eq!(sql(in_values(ident("a"), Vec::<i64>::new())), "FALSE");
        assert_eq!(sql(not_in_values(ident("a"), Vec::<i64>::new())), "TRUE");
    }

    #[test]
    fn test_between() {
        assert_eq!(sql(between(ident("a"), 1, 9)), "a BETWEEN 1 AND 9");
        assert_eq!(
            sql(not_between(ident("d"), "a", "m")),
            r#"d NOT BETWEEN "a" AND "m""#
        );
    }

    #[test]
    fn test_and_or_fold() {
        assert_eq!(sql(and([eq(ident("a"), 1)])), "a = 1");
        assert_eq!(
            sql(and([eq(ident("a"), 1), eq(ident("b"), "2"), ne(ident("c"), 3)])),
            r#"a = 1 AND b = "2" AND c != 3"#
        );
        assert_eq!(
            sql(or([eq(ident("a"), 1), eq(ident("b"), 2)])),
            "a = 1 OR b = 2"
        );
    }

    #[test]
    fn test_mixed_nesting_is_grouped() {
        let cond = and([
            eq(ident("a"), 1),
            or([eq(ident("b"), 2), eq(ident("c"), 3)]),
        ]);
        assert_eq!(sql(cond), "a = 1 AND (b = 2 OR c = 3)");

        let cond = or([
            and([eq(ident("a"), 1), eq(ident("b"), 2)]),
            is_null(ident("c")),
        ]);
        assert_eq!(sql(cond), "(a = 1 AND b = 2) OR c IS NULL");

        let cond = and([and([boolean(true), boolean(false)]), boolean(true)]);
        assert_eq!(sql(cond), "TRUE AND FALSE AND TRUE");
    }

    #[test]
    fn test_empty_combinators() {
        let err = and([]).to_condition().unwrap_err();
        assert!(matches!(err, Error::EmptyConditionList("AND")));
        let err = or([]).to_condition().unwrap_err();
        assert_eq!(err.to_string(), "OR requires at least one condition");
    }

    #[test]
    fn test_operand_error_surfaces_unchanged() {
        let err = eq(crate::operand::Ident::path(Vec::<String>::new()), 1)
            .to_condition()
            .unwrap_err();
        assert!(matches!(err, Error::EmptyIdentifier));

        let err = eq(ident("a"), u64::MAX).to_condition().unwrap_err();
        assert!(matches!(err, Error::IntegerOutOfRange(_)));
    }

    #[test]
    fn test_custom_conditions() {
        let raw = Expr::binary(BinaryOp::Equal, Expr::ident("x"), Expr::Param("x".into()));
        assert_eq!(sql(Cond::from(raw.clone())), "x = @x");
        assert_eq!(sql(and([Cond::from(raw), boolean(true)])), "x = @x AND TRUE");
    }
}
