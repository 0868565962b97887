pub mod albums;
pub mod artists;
pub mod categories;
pub mod ddl;
pub mod genres;
pub mod metadata;
pub mod questions;
pub mod shows;
pub mod venues;

use sea_query::{Asterisk, Expr, Iden, Query, SqliteQueryBuilder};

/// SELECT COUNT(*) FROM <table>
pub fn count_all<T>(table: T) -> String
where
    T: Iden + 'static,
{
    Query::select()
        .expr(Expr::col(Asterisk).count())
        .from(table)
        .to_string(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Questions;

    #[test]
    fn test_count_all() {
        assert_eq!(
            count_all(Questions::Table),
            "SELECT COUNT(*) FROM \"questions\""
        );
    }
}
