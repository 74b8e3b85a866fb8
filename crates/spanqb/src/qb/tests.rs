//! Statement-level tests for the qb module.

use chrono::{DateTime, NaiveDate};

use crate::ast::{BinaryOp, Direction, Expr};
use crate::condition::{
    and, between, boolean, eq, ge, gt, in_, in_subquery, is_not_null, is_null, like, ne, op, or,
};
use crate::error::{Error, QbResult};
use crate::literal;
use crate::operand::{Ident, ident, param};
use crate::qb::{
    ArraySubquery, ScalarSubquery, Statement, StatementKind, delete, insert, select, update,
};
use crate::value::{Nullable, ToExpr, Value};

struct Pair(&'static str, &'static str);

impl ToExpr for Pair {
    fn to_expr(&self) -> QbResult<Expr> {
        Ok(literal::array(vec![
            literal::string(self.0),
            literal::string(self.1),
        ]))
    }
}

// ==================== SELECT ====================

#[test]
fn test_select_basic() {
    let qb = select("hoge", ["a", "b"]);
    assert_eq!(qb.to_sql().unwrap(), "SELECT a, b FROM hoge");
}

#[test]
fn test_select_where() {
    let qb = select("hoge", ["a", "b"]);
    assert_eq!(
        qb.and_where(boolean(true)).to_sql().unwrap(),
        "SELECT a, b FROM hoge WHERE TRUE"
    );
    assert_eq!(
        qb.and_where(op(1, BinaryOp::Equal, 2)).to_sql().unwrap(),
        "SELECT a, b FROM hoge WHERE 1 = 2"
    );
    assert_eq!(
        qb.and_where(ne(ident("a"), "foo")).to_sql().unwrap(),
        r#"SELECT a, b FROM hoge WHERE a != "foo""#
    );
    assert_eq!(
        qb.and_where(and([eq(ident("a"), 1), eq(ident("b"), "2")]))
            .to_sql()
            .unwrap(),
        r#"SELECT a, b FROM hoge WHERE a = 1 AND b = "2""#
    );
    assert_eq!(
        qb.and_where_all([
            eq(ident("a"), 1),
            eq(ident("b"), "2"),
            ne(ident("c"), bytes::Bytes::from_static(&[3])),
        ])
        .to_sql()
        .unwrap(),
        r#"SELECT a, b FROM hoge WHERE a = 1 AND b = "2" AND c != B"\x03""#
    );
}

#[test]
fn test_select_end_to_end() {
    let sql = select("user", ["name", "created_at"])
        .and_where_all([
            eq(ident("race"), "Phoenix"),
            eq(ident("work_at"), "KFP"),
        ])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT name, created_at FROM user WHERE race = "Phoenix" AND work_at = "KFP""#
    );
}

#[test]
fn test_select_multiple_where_calls() {
    let sql = select("user", ["name", "created_at"])
        .and_where(eq(ident("job"), "detective"))
        .and_where(eq(ident("defective"), true))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT name, created_at FROM user WHERE job = "detective" AND defective = TRUE"#
    );
}

#[test]
fn test_select_where_groups_or() {
    let sql = select("user", ["name"])
        .and_where(or([is_null(ident("age")), gt(ident("age"), 20)]))
        .and_where(like(ident("name"), "A%"))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"SELECT name FROM user WHERE (age IS NULL OR age > 20) AND name LIKE "A%""#
    );
}

#[test]
fn test_select_order_by_and_limit() {
    let base = select("user", ["name", "created_at"]).and_where(is_not_null(ident("age")));
    assert_eq!(
        base.order_by("subscribers", Direction::Asc).to_sql().unwrap(),
        "SELECT name, created_at FROM user WHERE age IS NOT NULL ORDER BY subscribers ASC"
    );
    assert_eq!(
        base.order_by("a", Direction::Desc)
            .order_by("b", Direction::Asc)
            .limit(10)
            .to_sql()
            .unwrap(),
        "SELECT name, created_at FROM user WHERE age IS NOT NULL ORDER BY a DESC, b ASC LIMIT 10"
    );
    assert_eq!(
        base.limit(5).limit_offset(10, 3).to_sql().unwrap(),
        "SELECT name, created_at FROM user WHERE age IS NOT NULL LIMIT 10 OFFSET 3"
    );
    assert_eq!(
        base.limit_offset(10, 3).limit(7).to_sql().unwrap(),
        "SELECT name, created_at FROM user WHERE age IS NOT NULL LIMIT 7"
    );
}

#[test]
fn test_select_query_parameter() {
    let sql = select("user", ["name", "created_at"])
        .and_where(gt(ident("age"), param("age")))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "SELECT name, created_at FROM user WHERE age > @age");
}

#[test]
fn test_select_quotes_identifiers() {
    let sql = select("order", ["select", "x"])
        .and_where(eq(Ident::path(["TRUE", "FALSE"]), true))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT `select`, x FROM `order` WHERE `TRUE`.`FALSE` = TRUE"
    );
}

#[test]
fn test_select_subqueries() {
    let inner = select("item", ["id"]).and_where(eq(ident("owner"), param("owner")));
    let sql = select("user", ["name"])
        .subquery(ScalarSubquery::new(select("item", ["count"])).alias("n"))
        .subquery(ArraySubquery::new(inner.clone()))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT name, (SELECT count FROM item) AS n, ARRAY(SELECT id FROM item WHERE owner = @owner) FROM user"
    );

    let sql = select("user", ["name"])
        .and_where(in_subquery(ident("id"), select("admin", ["user_id"])))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT name FROM user WHERE id IN (SELECT user_id FROM admin)"
    );

    let sql = select("user", ["name"])
        .and_where(eq(ident("score"), ScalarSubquery::new(select("best", ["score"]))))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT name FROM user WHERE score = (SELECT score FROM best)"
    );
}

#[test]
fn test_select_requires_columns() {
    let err = select("hoge", Vec::<String>::new()).to_sql().unwrap_err();
    assert!(err.is_validation());

    // the column check runs before any condition is converted
    let err = select("hoge", Vec::<String>::new())
        .and_where(and([]))
        .to_sql()
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_select_invalid_subquery_fails() {
    let err = select("user", ["name"])
        .subquery(ArraySubquery::new(select("item", Vec::<String>::new())))
        .to_sql()
        .unwrap_err();
    assert!(err.is_validation());
}

// ==================== INSERT ====================

#[test]
fn test_insert_nulls() {
    let sql = insert("hoge", ["a", "b"])
        .values([[None::<String>, None]])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO hoge (a, b) VALUES (NULL, NULL)");

    let sql = insert("hoge", ["a", "b"])
        .values([vec![Value::Null, Value::Null]])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO hoge (a, b) VALUES (NULL, NULL)");
}

#[test]
fn test_insert_strings_and_nested_arrays() {
    let sql = insert("hoge", ["a", "b"])
        .values([["foo", "bar"]])
        .to_sql()
        .unwrap();
    assert_eq!(sql, r#"INSERT INTO hoge (a, b) VALUES ("foo", "bar")"#);

    let nested: Vec<Vec<&str>> = vec![vec![], vec!["a"], vec!["b", "c"]];
    let sql = insert("hoge", ["a", "b"])
        .values([nested])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO hoge (a, b) VALUES (ARRAY[], ARRAY["a"], ARRAY["b", "c"])"#
    );

    let nested: Vec<Vec<Option<&str>>> = vec![vec![], vec![Some("foo")], vec![Some("bar"), None]];
    let sql = insert("hoge", ["a", "b", "c"])
        .values([nested])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO hoge (a, b, c) VALUES (ARRAY[], ARRAY["foo"], ARRAY["bar", NULL])"#
    );
}

#[test]
fn test_insert_bytes() {
    let sql = insert("hoge", ["a", "b"])
        .values([[
            bytes::Bytes::from_static(&[0, 1]),
            bytes::Bytes::from_static(&[2, 3, 4]),
        ]])
        .to_sql()
        .unwrap();
    assert_eq!(sql, r#"INSERT INTO hoge (a, b) VALUES (B"\x00\x01", B"\x02\x03\x04")"#);

    let sql = insert("hoge", ["a", "b", "c"])
        .values([vec![
            Value::Array(vec![]),
            Value::Array(vec![Value::Bytes(vec![0, 1])]),
            Value::Array(vec![Value::Bytes(vec![2, 3, 4]), Value::Null]),
        ]])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO hoge (a, b, c) VALUES (ARRAY[], ARRAY[B"\x00\x01"], ARRAY[B"\x02\x03\x04", NULL])"#
    );
}

#[test]
fn test_insert_integers_and_bools() {
    let sql = insert("hoge", ["a", "b"])
        .values([[123i64, 456]])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO hoge (a, b) VALUES (123, 456)");

    let nested: Vec<Vec<i64>> = vec![vec![], vec![123], vec![456, 789]];
    let sql = insert("hoge", ["a", "b", "c"])
        .values([nested])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO hoge (a, b, c) VALUES (ARRAY[], ARRAY[123], ARRAY[456, 789])"
    );

    let nested = vec![
        vec![],
        vec![Nullable::new(123i64)],
        vec![Nullable::new(456), Nullable::null()],
    ];
    let sql = insert("hoge", ["a", "b", "c"])
        .values([nested])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO hoge (a, b, c) VALUES (ARRAY[], ARRAY[123], ARRAY[456, NULL])"
    );

    let sql = insert("hoge", ["a", "b"])
        .values([(true, false)])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO hoge (a, b) VALUES (TRUE, FALSE)");
}

#[test]
fn test_insert_floats() {
    let sql = insert("hoge", ["a", "b", "c", "d", "e", "f", "g"])
        .values([[
            Some(1.0),
            Some(0.0),
            Some(3.1415926535),
            Some(f64::NAN),
            Some(f64::INFINITY),
            Some(f64::NEG_INFINITY),
            None,
        ]])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO hoge (a, b, c, d, e, f, g) VALUES (1e+00, 0e+00, 3.1415926535e+00, NaN, +Inf, -Inf, NULL)"
    );

    let nested: Vec<Vec<f64>> = vec![vec![], vec![0.0], vec![31.5, f64::INFINITY]];
    let sql = insert("hoge", ["a", "b", "c"])
        .values([nested])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "INSERT INTO hoge (a, b, c) VALUES (ARRAY[], ARRAY[0e+00], ARRAY[3.15e+01, +Inf])"
    );
}

#[test]
fn test_insert_timestamps_and_dates() {
    let ts = |s: &str| DateTime::parse_from_rfc3339(s).unwrap();
    let sql = insert("hoge", ["a", "b", "c", "d"])
        .values([[
            ts("2020-06-06T12:34:56.123456Z"),
            ts("2021-08-10T00:01:23.456789+09:00"),
            ts("2022-12-08T14:22:51.837583-04:30"),
            ts("2023-10-10T08:43:17.536829+00:00"),
        ]])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        concat!(
            "INSERT INTO hoge (a, b, c, d) VALUES (",
            r#"TIMESTAMP "2020-06-06T12:34:56.123456Z", "#,
            r#"TIMESTAMP "2021-08-10T00:01:23.456789+09:00", "#,
            r#"TIMESTAMP "2022-12-08T14:22:51.837583-04:30", "#,
            r#"TIMESTAMP "2023-10-10T08:43:17.536829Z")"#,
        )
    );

    let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
    let sql = insert("hoge", ["a", "b"])
        .values([[Some(date("2024-03-02")), Some(date("2025-06-20"))]])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO hoge (a, b) VALUES (DATE "2024-03-02", DATE "2025-06-20")"#
    );
}

#[test]
fn test_insert_parameters_and_custom_encoders() {
    let sql = insert("hoge", ["a", "b"])
        .values([[param("a"), param("b")]])
        .to_sql()
        .unwrap();
    assert_eq!(sql, "INSERT INTO hoge (a, b) VALUES (@a, @b)");

    let sql = insert("hoge", ["a", "b"])
        .values([(Pair("aaa", "bbb"), Pair("ccc", "ddd"))])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO hoge (a, b) VALUES (ARRAY["aaa", "bbb"], ARRAY["ccc", "ddd"])"#
    );
}

#[test]
fn test_insert_heterogeneous_rows() {
    let sql = insert("hoge", ["a", "b", "c", "d"])
        .values([(123i64, "45", bytes::Bytes::from_static(&[6]), None::<i64>)])
        .to_sql()
        .unwrap();
    assert_eq!(sql, r#"INSERT INTO hoge (a, b, c, d) VALUES (123, "45", B"\x06", NULL)"#);

    let sql = insert("hoge", ["a", "b", "c", "d"])
        .row(vec![
            Value::from(123i64),
            Value::from("45"),
            Value::Bytes(vec![6]),
            Value::Null,
        ])
        .row([1, 2, 3, 4])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO hoge (a, b, c, d) VALUES (123, "45", B"\x06", NULL), (1, 2, 3, 4)"#
    );
}

#[test]
fn test_insert_json_rows() {
    let rows = vec![
        serde_json::json!({"a": 1, "B": "x"}),
        serde_json::json!([2, "y"]),
    ];
    let sql = insert("hoge", ["a", "b"]).values(rows).to_sql().unwrap();
    assert_eq!(sql, r#"INSERT INTO hoge (a, b) VALUES (1, "x"), (2, "y")"#);
}

#[test]
fn test_insert_values_replaces_rows() {
    let qb = insert("hoge", ["a"]).row([1]).row([2]);
    assert_eq!(qb.to_sql().unwrap(), "INSERT INTO hoge (a) VALUES (1), (2)");
    assert_eq!(
        qb.values([[3]]).to_sql().unwrap(),
        "INSERT INTO hoge (a) VALUES (3)"
    );
}

#[test]
fn test_insert_validation_order() {
    let err = insert("hoge", Vec::<String>::new()).to_sql().unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation error: INSERT requires at least one column"
    );

    let err = insert("hoge", ["a"]).to_sql().unwrap_err();
    assert_eq!(err.to_string(), "validation error: INSERT requires VALUES");

    let err = insert("hoge", ["a"])
        .values(Vec::<Vec<i64>>::new())
        .to_sql()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation error: INSERT requires at least one row"
    );
}

#[test]
fn test_insert_row_errors_carry_row_index() {
    let err = insert("hoge", ["a"])
        .row([1u64])
        .row([u64::MAX])
        .to_sql()
        .unwrap_err();
    assert!(matches!(err, Error::InRow { index: 1, .. }));

    let err = insert("hoge", ["a"])
        .values([vec![vec![serde_json::json!(1), serde_json::json!({})]]])
        .to_sql()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "row 0: at index 1: can't convert JSON object into SQL expr"
    );
    assert!(err.is_unsupported_type());

    let err = insert("hoge", ["a"])
        .values([Value::Int64(1)])
        .to_sql()
        .unwrap_err();
    assert!(matches!(err.root_cause(), Error::UnsupportedRowShape(_)));
}

// ==================== UPDATE ====================

#[test]
fn test_update_basic() {
    let qb = update("hoge").set("a", 1).and_where(boolean(true));
    assert_eq!(qb.to_sql().unwrap(), "UPDATE hoge SET a = 1 WHERE TRUE");

    let qb = qb.set("b", "foo");
    assert_eq!(
        qb.to_sql().unwrap(),
        r#"UPDATE hoge SET a = 1, b = "foo" WHERE TRUE"#
    );
}

#[test]
fn test_update_with_identifiers() {
    let sql = update("hoge")
        .set("a", ident("b"))
        .set("b", ident("a"))
        .and_where(eq(ident("c"), "bar"))
        .to_sql()
        .unwrap();
    assert_eq!(sql, r#"UPDATE hoge SET a = b, b = a WHERE c = "bar""#);
}

#[test]
fn test_update_end_to_end() {
    let sql = update("user")
        .set(ident("position"), "BOTTOM LEFT")
        .set(ident("immortal"), true)
        .and_where_all([
            eq(ident("color"), "orange"),
            eq(ident("manager"), true),
        ])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"UPDATE user SET position = "BOTTOM LEFT", immortal = TRUE WHERE color = "orange" AND manager = TRUE"#
    );

    let sql = update("user")
        .set("race", "gorilla")
        .and_where(eq(ident("race"), "angel"))
        .and_where(ge(ident("grip_strength_kg"), 50))
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"UPDATE user SET race = "gorilla" WHERE race = "angel" AND grip_strength_kg >= 50"#
    );

    let sql = update("user")
        .set("age", param("age"))
        .and_where(eq(ident("shark"), true))
        .to_sql()
        .unwrap();
    assert_eq!(sql, "UPDATE user SET age = @age WHERE shark = TRUE");
}

#[test]
fn test_update_validation_order() {
    let err = update("hoge").to_sql().unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation error: UPDATE requires at least one SET item"
    );

    let err = update("hoge").set("a", 1).to_sql().unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation error: UPDATE requires a WHERE condition"
    );

    // structural errors win over conversion errors
    let err = update("hoge").set("a", u64::MAX).to_sql().unwrap_err();
    assert!(err.is_validation());

    let err = update("hoge")
        .set(Ident::path(Vec::<String>::new()), 1)
        .and_where(boolean(true))
        .to_sql()
        .unwrap_err();
    assert!(matches!(err, Error::EmptyIdentifier));
}

// ==================== DELETE ====================

#[test]
fn test_delete_basic() {
    assert_eq!(
        delete("hoge").and_where(boolean(true)).to_sql().unwrap(),
        "DELETE FROM hoge WHERE TRUE"
    );
    assert_eq!(
        delete("hoge")
            .and_where(op(1, BinaryOp::Equal, 2))
            .to_sql()
            .unwrap(),
        "DELETE FROM hoge WHERE 1 = 2"
    );
    assert_eq!(
        delete("user")
            .and_where(between(ident("age"), 10, 20))
            .and_where(in_(ident("id"), vec![1i64, 2, 3]))
            .to_sql()
            .unwrap(),
        "DELETE FROM user WHERE age BETWEEN 10 AND 20 AND id IN UNNEST(ARRAY[1, 2, 3])"
    );
}

#[test]
fn test_delete_requires_where() {
    let err = delete("hoge").to_sql().unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation error: DELETE requires a WHERE condition"
    );

    let err = delete("hoge").and_where(or([])).to_sql().unwrap_err();
    assert!(matches!(err, Error::EmptyConditionList("OR")));
}

// ==================== Builder semantics ====================

#[test]
fn test_builders_branch_without_aliasing() {
    let base = select("user", ["name"]).and_where(eq(ident("a"), 1));
    let left = base.and_where(eq(ident("b"), 2));
    let right = base.and_where(eq(ident("c"), 3));

    assert_eq!(base.to_sql().unwrap(), "SELECT name FROM user WHERE a = 1");
    assert_eq!(
        left.to_sql().unwrap(),
        "SELECT name FROM user WHERE a = 1 AND b = 2"
    );
    assert_eq!(
        right.to_sql().unwrap(),
        "SELECT name FROM user WHERE a = 1 AND c = 3"
    );

    let base = insert("t", ["a"]).row([1]);
    let one = base.row([2]);
    let two = base.row([3]);
    assert_eq!(one.to_sql().unwrap(), "INSERT INTO t (a) VALUES (1), (2)");
    assert_eq!(two.to_sql().unwrap(), "INSERT INTO t (a) VALUES (1), (3)");
}

#[test]
fn test_render_is_repeatable() {
    let qb = update("t").set("a", 0.1).and_where(eq(ident("id"), 1));
    assert_eq!(qb.to_sql().unwrap(), qb.to_sql().unwrap());

    let err_qb = delete("t").and_where(eq(ident("id"), u64::MAX));
    assert_eq!(
        err_qb.to_sql().unwrap_err().to_string(),
        err_qb.to_sql().unwrap_err().to_string()
    );
}

#[test]
fn test_statement_trait() {
    fn render<S: Statement>(stmt: &S) -> (StatementKind, String) {
        (S::KIND, stmt.to_sql().unwrap())
    }

    let (kind, sql) = render(&delete("t").and_where(boolean(false)));
    assert_eq!(kind, StatementKind::Delete);
    assert_eq!(sql, "DELETE FROM t WHERE FALSE");

    let ast = Statement::to_ast(&select("t", ["a"])).unwrap();
    assert_eq!(ast.from, "t");
    assert_eq!(StatementKind::Insert.to_string(), "INSERT");
}

#[test]
fn test_builders_are_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<crate::qb::Select>();
    assert_send_sync::<crate::qb::Insert>();
    assert_send_sync::<crate::qb::Update>();
    assert_send_sync::<crate::qb::Delete>();
}

#[cfg(feature = "derive")]
#[test]
fn test_insert_derived_rows() {
    #[derive(crate::ToRow)]
    struct Item {
        #[spanner(column = "ItemId")]
        id: i64,
        label: Option<String>,
    }

    let sql = insert("Items", ["ItemId", "Label"])
        .values([
            Item {
                id: 1,
                label: Some("a".into()),
            },
            Item { id: 2, label: None },
        ])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        r#"INSERT INTO Items (ItemId, Label) VALUES (1, "a"), (2, NULL)"#
    );
}

#[cfg(feature = "tracing")]
#[test]
fn test_truncate_sql() {
    use super::truncate_sql;

    assert_eq!(truncate_sql("SELECT 1", 200), "SELECT 1");
    assert_eq!(truncate_sql("SELECT 1", 6), "SELECT...");
    // never splits a multi-byte character
    assert_eq!(truncate_sql("ab日本", 3), "ab...");
}
