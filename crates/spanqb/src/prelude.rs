//! Glob-importable names for building statements.
//!
//! ```
//! use spanqb::prelude::*;
//!
//! let qb = delete("session").and_where(lt(ident("expires_at"), param("now")));
//! assert_eq!(
//!     qb.to_sql().unwrap(),
//!     "DELETE FROM session WHERE expires_at < @now"
//! );
//! ```

pub use crate::ast::{BinaryOp, Direction};
pub use crate::condition::{
    Cond, Condition, and, between, boolean, eq, ge, gt, in_, in_subquery, in_values,
    is_not_null, is_null, le, like, lt, ne, not_between, not_in, not_in_subquery, not_in_values,
    not_like, op, or,
};
pub use crate::error::QbResult;
pub use crate::operand::{Ident, Param, ident, param};
pub use crate::qb::{
    ArraySubquery, ScalarSubquery, Statement, delete, insert, select, update,
};
pub use crate::row::ToRow;
pub use crate::value::{Nullable, ToExpr, Value};

#[cfg(feature = "derive")]
pub use spanqb_derive::ToRow;
