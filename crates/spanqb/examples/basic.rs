//! Basic usage example for spanqb
//!
//! Run with: cargo run --example basic -p spanqb

use spanqb::prelude::*;
use spanqb::Error;

#[derive(Debug, ToRow)]
struct User {
    #[spanner(column = "UserId")]
    id: i64,
    name: String,
    email: Option<String>,
    #[spanner(skip)]
    #[allow(dead_code)]
    session: Option<String>,
}

fn main() -> Result<(), Error> {
    let users = vec![
        User {
            id: 1,
            name: "alice".into(),
            email: Some("alice@example.com".into()),
            session: None,
        },
        User {
            id: 2,
            name: "bob".into(),
            email: None,
            session: Some("token".into()),
        },
    ];

    // INSERT
    let sql = insert("Users", ["UserId", "Name", "Email"])
        .values(users)
        .to_sql()?;
    println!("{sql}");

    // SELECT, branching from a shared base
    let base = select("Users", ["UserId", "Name"]).and_where(is_not_null(ident("Email")));
    let page = base
        .order_by("Name", Direction::Asc)
        .limit_offset(10, 20)
        .to_sql()?;
    println!("{page}");

    let filtered = base
        .and_where(or([like(ident("Name"), "a%"), in_(ident("UserId"), param("ids"))]))
        .to_sql()?;
    println!("{filtered}");

    // UPDATE
    let sql = update("Users")
        .set("Email", Value::Null)
        .and_where(eq(ident("UserId"), 2))
        .to_sql()?;
    println!("{sql}");

    // DELETE without WHERE is rejected
    match delete("Users").to_sql() {
        Ok(sql) => println!("{sql}"),
        Err(e) => println!("rejected: {e}"),
    }

    Ok(())
}
