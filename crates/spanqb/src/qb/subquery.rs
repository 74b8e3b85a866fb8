//! Scalar and array subqueries.

use crate::ast::{Expr, SelectItem};
use crate::error::QbResult;
use crate::qb::Select;
use crate::value::ToExpr;

macro_rules! subquery_type {
    ($(#[$doc:meta])* $name:ident => $variant:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug)]
        pub struct $name {
            query: Box<Select>,
            alias: Option<String>,
        }

        impl $name {
            pub fn new(query: Select) -> Self {
                Self {
                    query: Box::new(query),
                    alias: None,
                }
            }

            /// Name the projected column: `(...) AS name`.
            pub fn alias(&self, name: impl Into<String>) -> Self {
                Self {
                    query: self.query.clone(),
                    alias: Some(name.into()),
                }
            }

            fn select_item(&self) -> QbResult<SelectItem> {
                let expr = self.to_expr()?;
                Ok(match &self.alias {
                    Some(alias) => SelectItem::Alias {
                        expr,
                        alias: alias.clone(),
                    },
                    None => SelectItem::Expr(expr),
                })
            }
        }

        /// The alias only applies in a SELECT list and is ignored here.
        impl ToExpr for $name {
            fn to_expr(&self) -> QbResult<Expr> {
                Ok(Expr::$variant(Box::new(self.query.to_ast()?)))
            }
        }

        impl From<$name> for Subquery {
            fn from(query: $name) -> Self {
                Subquery::$variant(query)
            }
        }
    };
}

subquery_type! {
    /// `(SELECT ...)`, a subquery yielding one value.
    ScalarSubquery => ScalarSubquery
}

subquery_type! {
    /// `ARRAY(SELECT ...)`, a subquery yielding an array.
    ArraySubquery => ArraySubquery
}

/// A subquery projected by a SELECT.
#[derive(Clone, Debug)]
pub enum Subquery {
    ScalarSubquery(ScalarSubquery),
    ArraySubquery(ArraySubquery),
}

impl Subquery {
    pub(crate) fn to_select_item(&self) -> QbResult<SelectItem> {
        match self {
            Subquery::ScalarSubquery(query) => query.select_item(),
            Subquery::ArraySubquery(query) => query.select_item(),
        }
    }
}

impl ToExpr for Subquery {
    fn to_expr(&self) -> QbResult<Expr> {
        match self {
            Subquery::ScalarSubquery(query) => query.to_expr(),
            Subquery::ArraySubquery(query) => query.to_expr(),
        }
    }
}
