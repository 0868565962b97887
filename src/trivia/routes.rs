use axum::{
    extract::{Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::{ANY_CATEGORY, MAX_DIFFICULTY, MIN_DIFFICULTY, PAGE_SIZE};
use crate::error::FieldError;
use crate::listing::{page_from_query, paginate};
use crate::models::{Category, NewQuestion, Question};
use crate::quiz::{resolve_category, select_question};
use crate::serve::AppState;
use crate::trivia::error::{ApiError, ApiJson, ApiPath};
use crate::trivia::store;

type SharedState = Arc<AppState>;
type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/categories", get(categories_handler))
        .route(
            "/api/categories/{id}/questions",
            get(category_questions_handler),
        )
        .route(
            "/api/questions",
            get(questions_handler).post(create_question_handler),
        )
        .route("/api/questions/{id}", delete(delete_question_handler))
        .route("/api/questions/search", post(search_handler))
        .route("/api/quizzes", post(quiz_handler))
        .method_not_allowed_fallback(method_not_allowed_handler)
        .fallback(not_found_handler)
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}

/// An id sent either as a JSON number or as a numeric string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseId {
    Number(i64),
    Text(String),
}

impl LooseId {
    fn as_i64(&self) -> Option<i64> {
        match self {
            LooseId::Number(n) => Some(*n),
            LooseId::Text(s) => s.trim().parse().ok(),
        }
    }
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Serialize)]
struct CategoriesResponse {
    categories: Vec<Category>,
    total_categories: usize,
    success: bool,
}

async fn categories_handler(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<CategoriesResponse> {
    let all = store::list_categories(&state.pool).await?;
    Ok(Json(CategoriesResponse {
        categories: paginate(&all, page_from_query(&params), PAGE_SIZE),
        total_categories: all.len(),
        success: true,
    }))
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: String,
    success: bool,
}

async fn category_questions_handler(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<CategoryQuestionsResponse> {
    let category = store::get_category(&state.pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let all = store::questions_in_category(&state.pool, id).await?;

    Ok(Json(CategoryQuestionsResponse {
        questions: paginate(&all, page_from_query(&params), PAGE_SIZE),
        total_questions: all.len(),
        current_category: category.kind,
        success: true,
    }))
}

// ============================================================================
// Questions
// ============================================================================

#[derive(Serialize)]
struct QuestionsResponse {
    categories: Vec<String>,
    questions: Vec<Question>,
    total_questions: usize,
    success: bool,
}

async fn questions_handler(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<QuestionsResponse> {
    let all = store::list_questions(&state.pool).await?;
    let categories = store::list_categories(&state.pool).await?;

    Ok(Json(QuestionsResponse {
        categories: categories.into_iter().map(|c| c.kind).collect(),
        questions: paginate(&all, page_from_query(&params), PAGE_SIZE),
        total_questions: all.len(),
        success: true,
    }))
}

#[derive(Serialize)]
struct DeletedResponse {
    deleted: i64,
    questions: Vec<Question>,
    total_questions: usize,
    success: bool,
}

async fn delete_question_handler(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<i64>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<DeletedResponse> {
    store::delete_question(&state.pool, id).await?;
    info!("Deleted question {}", id);

    let all = store::list_questions(&state.pool).await?;
    Ok(Json(DeletedResponse {
        deleted: id,
        questions: paginate(&all, page_from_query(&params), PAGE_SIZE),
        total_questions: all.len(),
        success: true,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct QuestionRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<LooseId>,
    pub difficulty: Option<LooseId>,
}

/// Check a submitted question, reporting every bad field at once
pub fn validate_question(request: &QuestionRequest) -> Result<NewQuestion, Vec<FieldError>> {
    let mut errors = Vec::new();

    let text = |value: &Option<String>, field: &str, errors: &mut Vec<FieldError>| {
        match value.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.to_string(),
            None => {
                errors.push(FieldError::new(field, "is required"));
                String::new()
            }
        }
    };
    let question = text(&request.question, "question", &mut errors);
    let answer = text(&request.answer, "answer", &mut errors);

    let category = request.category.as_ref().and_then(LooseId::as_i64);
    if category.is_none() {
        errors.push(FieldError::new("category", "must be an integer category id"));
    }

    let difficulty = request
        .difficulty
        .as_ref()
        .and_then(LooseId::as_i64)
        .filter(|d| (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(d));
    if difficulty.is_none() {
        errors.push(FieldError::new(
            "difficulty",
            format!("must be between {} and {}", MIN_DIFFICULTY, MAX_DIFFICULTY),
        ));
    }

    match (category, difficulty) {
        (Some(category), Some(difficulty)) if errors.is_empty() => Ok(NewQuestion {
            question,
            answer,
            category,
            difficulty,
        }),
        _ => Err(errors),
    }
}

#[derive(Serialize)]
struct CreatedResponse {
    created: i64,
    questions: Vec<Question>,
    total_questions: usize,
    success: bool,
}

async fn create_question_handler(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
    ApiJson(request): ApiJson<QuestionRequest>,
) -> ApiResult<CreatedResponse> {
    let question = validate_question(&request).map_err(ApiError::invalid)?;
    let id = store::create_question(&state.pool, &question).await?;
    info!("Created question {} in category {}", id, question.category);

    let all = store::list_questions(&state.pool).await?;
    Ok(Json(CreatedResponse {
        created: id,
        questions: paginate(&all, page_from_query(&params), PAGE_SIZE),
        total_questions: all.len(),
        success: true,
    }))
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    #[serde(rename = "searchTerm", default)]
    search_term: String,
}

#[derive(Serialize)]
struct SearchResponse {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<String>,
    success: bool,
}

async fn search_handler(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
    ApiJson(request): ApiJson<SearchRequest>,
) -> ApiResult<SearchResponse> {
    let matches = store::search_questions(&state.pool, &request.search_term).await?;
    debug!(
        "Search '{}' matched {} question(s)",
        request.search_term,
        matches.len()
    );

    Ok(Json(SearchResponse {
        questions: paginate(&matches, page_from_query(&params), PAGE_SIZE),
        total_questions: matches.len(),
        current_category: None,
        success: true,
    }))
}

// ============================================================================
// Quizzes
// ============================================================================

#[derive(Debug, Deserialize)]
struct QuizCategory {
    id: LooseId,
}

#[derive(Debug, Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Vec<LooseId>,
    quiz_category: QuizCategory,
}

#[derive(Serialize)]
struct QuizResponse {
    question: Option<Question>,
    #[serde(rename = "previousQuestions")]
    previous_questions: Vec<i64>,
    #[serde(rename = "foundQuestion")]
    found_question: bool,
    success: bool,
}

async fn quiz_handler(
    State(state): State<SharedState>,
    ApiJson(request): ApiJson<QuizRequest>,
) -> ApiResult<QuizResponse> {
    let requested = request
        .quiz_category
        .id
        .as_i64()
        .ok_or_else(|| ApiError::unprocessable("quiz_category.id must be an integer"))?;
    let previous = request
        .previous_questions
        .iter()
        .map(LooseId::as_i64)
        .collect::<Option<Vec<i64>>>()
        .ok_or_else(|| ApiError::unprocessable("previous_questions must be integer ids"))?;

    let category = if requested == ANY_CATEGORY {
        let categories = store::list_categories(&state.pool).await?;
        let mut rng = rand::thread_rng();
        resolve_category(None, &categories, &mut rng)
    } else {
        Some(requested)
    };

    let question = match category {
        Some(category) => {
            let candidates = store::questions_in_category(&state.pool, category).await?;
            let mut rng = rand::thread_rng();
            select_question(&candidates, category, &previous, &mut rng).cloned()
        }
        None => None,
    };

    Ok(Json(QuizResponse {
        found_question: question.is_some(),
        question,
        previous_questions: previous,
        success: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> QuestionRequest {
        serde_json::from_value(json).unwrap()
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn test_validate_accepts_numeric_strings() {
        let question = validate_question(&request(serde_json::json!({
            "question": "What is the heaviest organ in the human body?",
            "answer": "The Liver",
            "category": "1",
            "difficulty": 4
        })))
        .unwrap();
        assert_eq!(question.category, 1);
        assert_eq!(question.difficulty, 4);
    }

    #[test]
    fn test_validate_reports_every_field() {
        let errors = validate_question(&request(serde_json::json!({
            "question": "  ",
            "category": "science",
            "difficulty": 9
        })))
        .unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["question", "answer", "category", "difficulty"]
        );
    }

    #[test]
    fn test_validate_empty_body() {
        let errors = validate_question(&QuestionRequest::default()).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_quiz_request_shapes() {
        let parsed: QuizRequest = serde_json::from_value(serde_json::json!({
            "previous_questions": [5, "9"],
            "quiz_category": {"type": "Science", "id": "1"}
        }))
        .unwrap();
        let previous: Vec<Option<i64>> =
            parsed.previous_questions.iter().map(LooseId::as_i64).collect();
        assert_eq!(previous, vec![Some(5), Some(9)]);
        assert_eq!(parsed.quiz_category.id.as_i64(), Some(1));

        let parsed: QuizRequest =
            serde_json::from_value(serde_json::json!({"quiz_category": {"id": 0}})).unwrap();
        assert!(parsed.previous_questions.is_empty());
        assert_eq!(parsed.quiz_category.id.as_i64(), Some(ANY_CATEGORY));
    }
}
