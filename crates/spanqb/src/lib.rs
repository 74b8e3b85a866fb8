//! # spanqb
//!
//! An immutable query builder that renders Cloud Spanner (GoogleSQL) text
//! from typed Rust values.
//!
//! ## Features
//!
//! - **Exact literals**: strings, bytes, integers, floats, timestamps, dates
//!   and arrays of any depth render to canonical GoogleSQL literals
//! - **Typed rows**: tuples, `Vec`s, JSON values or `#[derive(ToRow)]`
//!   structs bind to INSERT columns
//! - **Composable conditions**: comparisons, IS NULL, IN, BETWEEN and
//!   LIKE combined with AND/OR
//! - **Branchable builders**: every method returns a new builder
//! - **Safe defaults**: UPDATE and DELETE require WHERE
//!
//! ## Example
//!
//! ```
//! use spanqb::prelude::*;
//!
//! # fn main() -> QbResult<()> {
//! let sql = select("user", ["name", "created_at"])
//!     .and_where(eq(ident("race"), "Phoenix"))
//!     .and_where(is_not_null(ident("age")))
//!     .order_by("subscribers", Direction::Asc)
//!     .limit(10)
//!     .to_sql()?;
//! assert_eq!(
//!     sql,
//!     r#"SELECT name, created_at FROM user WHERE race = "Phoenix" AND age IS NOT NULL ORDER BY subscribers ASC LIMIT 10"#,
//! );
//!
//! #[derive(ToRow)]
//! struct User {
//!     #[spanner(column = "UserName")]
//!     name: String,
//!     age: Option<i64>,
//! }
//!
//! let sql = insert("user", ["UserName", "Age"])
//!     .values([User { name: "alice".into(), age: None }])
//!     .to_sql()?;
//! assert_eq!(sql, r#"INSERT INTO user (UserName, Age) VALUES ("alice", NULL)"#);
//! # Ok(())
//! # }
//! ```
//!
//! Custom types take part by implementing [`ToExpr`].
//!
//! ## Cargo features
//!
//! - `derive` (default): `#[derive(ToRow)]`
//! - `uuid`: `uuid::Uuid` renders as a STRING literal
//! - `tracing`: debug events with the rendered SQL, target `spanqb.sql`

// Lets derive-generated `::spanqb::...` paths resolve inside this crate.
extern crate self as spanqb;

pub mod ast;
pub mod condition;
pub mod error;
pub mod literal;
pub mod operand;
pub mod prelude;
pub mod qb;
pub mod row;
pub mod value;

pub use ast::{BinaryOp, Direction, Expr};
pub use condition::{
    Cond, Condition, DynCondition, and, between, boolean, eq, ge, gt, in_, in_subquery,
    in_values, is_not_null, is_null, le, like, lt, ne, not_between, not_in, not_in_subquery,
    not_in_values, not_like, op, or,
};
pub use error::{Error, QbResult};
pub use operand::{Ident, Operand, Param, ident, param};
pub use qb::{
    ArraySubquery, Delete, Insert, ScalarSubquery, Select, Statement, StatementKind, Subquery,
    Update, delete, insert, select, update,
};
pub use row::{FieldSpec, Record, Row, ToRow, bind_record, to_row};
pub use value::{Nullable, ToExpr, Value, to_expr};

#[cfg(feature = "derive")]
pub use spanqb_derive::ToRow;
