use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use crate::schema::Categories;

/// SELECT id, type FROM categories ORDER BY id
pub fn select_all() -> String {
    Query::select()
        .columns([Categories::Id, Categories::Type])
        .from(Categories::Table)
        .order_by(Categories::Id, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT id, type FROM categories WHERE id = ?
pub fn select_by_id(id: i64) -> String {
    Query::select()
        .columns([Categories::Id, Categories::Type])
        .from(Categories::Table)
        .and_where(Expr::col(Categories::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO categories (type) VALUES (?)
pub fn insert(kind: &str) -> String {
    Query::insert()
        .into_table(Categories::Table)
        .columns([Categories::Type])
        .values_panic([kind.into()])
        .to_string(SqliteQueryBuilder)
}
