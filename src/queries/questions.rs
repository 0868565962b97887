use sea_query::{Expr, Order, Query, SqliteQueryBuilder};

use crate::models::NewQuestion;
use crate::schema::Questions;

const COLUMNS: [Questions; 5] = [
    Questions::Id,
    Questions::Question,
    Questions::Answer,
    Questions::Category,
    Questions::Difficulty,
];

/// SELECT ... FROM questions ORDER BY id
pub fn select_all() -> String {
    Query::select()
        .columns(COLUMNS)
        .from(Questions::Table)
        .order_by(Questions::Id, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// SELECT ... FROM questions WHERE category = ? ORDER BY id
pub fn select_by_category(category: i64) -> String {
    Query::select()
        .columns(COLUMNS)
        .from(Questions::Table)
        .and_where(Expr::col(Questions::Category).eq(category))
        .order_by(Questions::Id, Order::Asc)
        .to_string(SqliteQueryBuilder)
}

/// INSERT INTO questions (question, answer, category, difficulty) VALUES (?, ?, ?, ?)
pub fn insert(question: &NewQuestion) -> String {
    Query::insert()
        .into_table(Questions::Table)
        .columns([
            Questions::Question,
            Questions::Answer,
            Questions::Category,
            Questions::Difficulty,
        ])
        .values_panic([
            question.question.as_str().into(),
            question.answer.as_str().into(),
            question.category.into(),
            question.difficulty.into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// DELETE FROM questions WHERE id = ?
pub fn delete(id: i64) -> String {
    Query::delete()
        .from_table(Questions::Table)
        .and_where(Expr::col(Questions::Id).eq(id))
        .to_string(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter_ordered_by_id() {
        let sql = select_by_category(2);
        assert!(sql.contains("WHERE \"category\" = 2"), "{}", sql);
        assert!(sql.ends_with("ORDER BY \"id\" ASC"), "{}", sql);
    }
}
