//! Operand storage for conditions, plus identifier and parameter operands.

use std::fmt;
use std::sync::Arc;

use crate::ast::Expr;
use crate::error::{Error, QbResult};
use crate::value::{ToExpr, Value};

/// A clone-friendly operand wrapper using Arc.
///
/// Conditions keep their operands unconverted until the statement is
/// rendered, so cloning a condition never copies the operand values.
#[derive(Clone)]
pub struct Operand(pub(crate) Arc<dyn ToExpr + Send + Sync>);

impl Operand {
    /// Create a new operand from any convertible value.
    pub fn new<T: ToExpr + Send + Sync + 'static>(value: T) -> Self {
        Operand(Arc::new(value))
    }
}

impl ToExpr for Operand {
    fn to_expr(&self) -> QbResult<Expr> {
        self.0.to_expr()
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Operand").field(&"<dyn ToExpr>").finish()
    }
}

/// A column reference, optionally qualified: `a`, `t.a`, `a.b.c`.
///
/// Every segment is quoted on its own when rendered, so `ident("TRUE")`
/// refers to a column named TRUE rather than the boolean literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    segments: Vec<String>,
}

impl Ident {
    /// Single-segment identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Dotted path. An empty path fails when converted.
    pub fn path<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a segment: `ident("t").child("a")` is `t.a`.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl ToExpr for Ident {
    fn to_expr(&self) -> QbResult<Expr> {
        if self.segments.is_empty() {
            return Err(Error::EmptyIdentifier);
        }
        Ok(Expr::Ident(self.segments.clone()))
    }
}

impl From<&str> for Ident {
    fn from(name: &str) -> Self {
        Ident::new(name)
    }
}

impl From<String> for Ident {
    fn from(name: String) -> Self {
        Ident::new(name)
    }
}

/// Shorthand for [`Ident::new`].
pub fn ident(name: impl Into<String>) -> Ident {
    Ident::new(name)
}

/// A named query parameter, rendered as `@name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param(String);

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Param(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl ToExpr for Param {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(Expr::Param(self.0.clone()))
    }
}

impl From<Param> for Value {
    fn from(p: Param) -> Self {
        Value::Expr(Expr::Param(p.0))
    }
}

/// Shorthand for [`Param::new`].
pub fn param(name: impl Into<String>) -> Param {
    Param::new(name)
}
