use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_all_categories,
            questions::{
                self, count_questions, count_search_matches, get_question_by_id, get_questions,
                search_questions,
            },
        },
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::{deserialize_option_number_from_string, deserialize_option_text},
        error::ApiError,
        extract::{JsonBody, PathId, QueryParams},
    },
};

use super::{categories::category_map, ApiResponse, Pagination};

#[derive(Deserialize)]
struct QuestionForm {
    #[serde(default, deserialize_with = "deserialize_option_text")]
    question: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_text")]
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

impl From<QuestionForm> for NewQuestion {
    fn from(form: QuestionForm) -> Self {
        NewQuestion {
            question: form.question,
            answer: form.answer,
            category: form.category,
            difficulty: form.difficulty,
        }
    }
}

#[derive(Deserialize)]
struct SearchForm {
    search: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
    total_questions: i64,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
    total_questions: i64,
}

async fn questions_page(
    State(pool): State<SqlitePool>,
    QueryParams(pagination): QueryParams<Pagination>,
) -> ApiResponse<QuestionsPage> {
    let window = pagination.window().ok_or(ApiError::NotFound)?;
    let questions = get_questions(&pool, window).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_questions = count_questions(&pool).await?;
    let categories = category_map(get_all_categories(&pool).await?);

    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        categories,
    }))
}

// a missing id is reported as unprocessable, the same as a failed delete
async fn delete_question(
    State(pool): State<SqlitePool>,
    PathId(id): PathId<i64>,
) -> ApiResponse<Deleted> {
    if get_question_by_id(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?
        .is_none()
    {
        tracing::info!("Question {} does not exist", id);
        return Err(ApiError::Unprocessable);
    }

    questions::delete_question(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?;
    let total_questions = count_questions(&pool)
        .await
        .map_err(ApiError::unprocessable)?;
    tracing::info!("Deleted question {}", id);

    Ok(Json(Deleted {
        success: true,
        deleted: id,
        total_questions,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    JsonBody(form): JsonBody<QuestionForm>,
) -> ApiResponse<Created> {
    let id = questions::create_question(&pool, &form.into())
        .await
        .map_err(ApiError::unprocessable)?;
    let total_questions = count_questions(&pool)
        .await
        .map_err(ApiError::unprocessable)?;
    tracing::info!("Created question {}", id);

    Ok(Json(Created {
        success: true,
        created: id,
        total_questions,
    }))
}

async fn search(
    State(pool): State<SqlitePool>,
    QueryParams(pagination): QueryParams<Pagination>,
    JsonBody(form): JsonBody<SearchForm>,
) -> ApiResponse<SearchResults> {
    let term = form.search.ok_or(ApiError::BadRequest)?;
    let total_questions = count_search_matches(&pool, &term).await?;
    if total_questions == 0 {
        return Err(ApiError::NotFound);
    }
    let questions = match pagination.window() {
        Some(window) => search_questions(&pool, &term, window).await?,
        None => Vec::new(),
    };

    Ok(Json(SearchResults {
        success: true,
        questions,
        total_questions,
        current_category: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(questions_page).post(create_question))
        .route("/questions/{id}", delete(delete_question))
        .route("/questions/search", post(search))
        .with_state(state)
}
