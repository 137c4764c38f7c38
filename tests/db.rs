use diesel::prelude::*;
use diesel::sql_types::BigInt;

mod common;

#[derive(QueryableByName)]
struct Count {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[test]
fn migrations_create_the_catalog_tables() {
    let test_db = common::TestDb::new();
    let mut conn = test_db.pool().get().expect("should acquire DB connection");

    let tables: Count = diesel::sql_query(
        "SELECT COUNT(*) AS count FROM sqlite_master \
         WHERE type = 'table' AND name IN ('records', 'record_themes')",
    )
    .get_result(&mut conn)
    .expect("should query sqlite_master");

    assert_eq!(tables.count, 2);
}
