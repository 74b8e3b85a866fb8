//! Derive macros for spanqb
//!
//! Provides `#[derive(ToRow)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod to_row;

/// Derive `Record` and `ToRow` for a struct, so it can be used as an
/// INSERT row bound by column name.
///
/// # Example
///
/// ```
/// use spanqb::ToRow;
///
/// #[derive(ToRow)]
/// struct Singer {
///     #[spanner(column = "SingerId")]
///     id: i64,
///     first_name: Option<String>,
///     #[spanner(skip)]
///     cache: Vec<u8>,
/// }
///
/// let singer = Singer { id: 1, first_name: Some("Marc".into()), cache: Vec::new() };
/// let sql = spanqb::insert("Singers", ["SingerId", "First_Name"])
///     .values([singer])
///     .to_sql()
///     .unwrap();
/// assert_eq!(sql, r#"INSERT INTO Singers (SingerId, First_Name) VALUES (1, "Marc")"#);
/// ```
///
/// # Attributes
///
/// - `#[spanner(column = "Name")]` - Bind the field to this exact column name
///   instead of its own name
/// - `#[spanner(skip)]` - Never bind this field
///
/// Fields without `column` match columns by name, ignoring ASCII case.
/// Every bound field type must implement `spanqb::ToExpr`.
#[proc_macro_derive(ToRow, attributes(spanner))]
pub fn derive_to_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    to_row::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
