use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, get_category},
            questions::{count_questions_for_category, get_questions_for_category},
        },
        Category, Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        extract::{PathId, QueryParams},
    },
};

use super::{ApiResponse, Pagination};

#[derive(Serialize)]
struct CategoriesBody {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestionsBody {
    success: bool,
    questions: Vec<Question>,
    category: String,
    total_questions: i64,
}

pub(crate) fn category_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesBody> {
    let categories = category_map(get_all_categories(&pool).await?);
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesBody {
        success: true,
        categories,
    }))
}

// an unknown category id is unprocessable, a known one without any questions
// is not found; a page past the end is an empty list
async fn get_category_questions(
    State(pool): State<SqlitePool>,
    PathId(id): PathId<i64>,
    QueryParams(pagination): QueryParams<Pagination>,
) -> ApiResponse<CategoryQuestionsBody> {
    let category = get_category(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?
        .ok_or_else(|| {
            tracing::info!("Unknown category {}", id);
            ApiError::Unprocessable
        })?;

    let total_questions = count_questions_for_category(&pool, id)
        .await
        .map_err(ApiError::unprocessable)?;
    if total_questions == 0 {
        return Err(ApiError::NotFound);
    }
    let questions = match pagination.window() {
        Some(window) => get_questions_for_category(&pool, id, window)
            .await
            .map_err(ApiError::unprocessable)?,
        None => Vec::new(),
    };

    Ok(Json(CategoryQuestionsBody {
        success: true,
        questions,
        category: category.kind,
        total_questions,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_category_questions))
        .with_state(state)
}
