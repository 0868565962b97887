//! Trivia storage operations.

use sqlx::sqlite::SqlitePool;
use sqlx::SqliteConnection;

use crate::db::commit_or_rollback;
use crate::error::{StoreError, StoreResult};
use crate::listing::filter_by_term;
use crate::models::{Category, NewQuestion, Question};
use crate::queries::{categories, questions};

pub async fn list_categories(pool: &SqlitePool) -> StoreResult<Vec<Category>> {
    Ok(sqlx::query_as::<_, Category>(&categories::select_all())
        .fetch_all(pool)
        .await?)
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> StoreResult<Option<Category>> {
    Ok(sqlx::query_as::<_, Category>(&categories::select_by_id(id))
        .fetch_optional(pool)
        .await?)
}

pub async fn list_questions(pool: &SqlitePool) -> StoreResult<Vec<Question>> {
    Ok(sqlx::query_as::<_, Question>(&questions::select_all())
        .fetch_all(pool)
        .await?)
}

pub async fn questions_in_category(pool: &SqlitePool, category: i64) -> StoreResult<Vec<Question>> {
    Ok(
        sqlx::query_as::<_, Question>(&questions::select_by_category(category))
            .fetch_all(pool)
            .await?,
    )
}

/// Questions whose text contains `term`, case-insensitively, in id order
pub async fn search_questions(pool: &SqlitePool, term: &str) -> StoreResult<Vec<Question>> {
    let all = list_questions(pool).await?;
    Ok(filter_by_term(all, term, |question| question.question.as_str()))
}

/// Insert a question whose category must already exist
pub(crate) async fn insert_question(
    conn: &mut SqliteConnection,
    question: &NewQuestion,
) -> StoreResult<i64> {
    let category = sqlx::query_as::<_, Category>(&categories::select_by_id(question.category))
        .fetch_optional(&mut *conn)
        .await?;
    if category.is_none() {
        return Err(StoreError::invalid(
            "category",
            format!("category {} does not exist", question.category),
        ));
    }

    Ok(sqlx::query(&questions::insert(question))
        .execute(&mut *conn)
        .await?
        .last_insert_rowid())
}

pub async fn create_question(pool: &SqlitePool, question: &NewQuestion) -> StoreResult<i64> {
    let mut tx = pool.begin().await?;
    let result = insert_question(&mut tx, question).await;
    commit_or_rollback(tx, result).await
}

pub async fn delete_question(pool: &SqlitePool, id: i64) -> StoreResult<()> {
    let mut tx = pool.begin().await?;
    let result = async {
        let deleted = sqlx::query(&questions::delete(id))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(StoreError::NotFound {
                entity: "question",
                id,
            });
        }
        Ok(())
    }
    .await;
    commit_or_rollback(tx, result).await
}
