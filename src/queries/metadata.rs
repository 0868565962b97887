use sea_query::{Expr, OnConflict, Query, SqliteQueryBuilder};

use crate::schema::Metadata;

/// SELECT value FROM metadata WHERE key = ?
pub fn select_by_key(key: &str) -> String {
    Query::select()
        .column(Metadata::Value)
        .from(Metadata::Table)
        .and_where(Expr::col(Metadata::Key).eq(key))
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO metadata (key, value) VALUES (?, ?) ON CONFLICT DO NOTHING
pub fn insert_or_ignore(key: &str, value: &str) -> String {
    Query::insert()
        .into_table(Metadata::Table)
        .columns([Metadata::Key, Metadata::Value])
        .values_panic([key.into(), value.into()])
        .on_conflict(OnConflict::new().do_nothing().to_owned())
        .to_string(SqliteQueryBuilder)
}
