use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions::get_quiz_candidates, Question},
    server::{
        app::AppState, deserializers::deserialize_number_from_string, error::ApiError,
        extract::JsonBody,
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::ApiResponse;

/// Category id that stands for "every category".
pub const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: Option<QuizCategory>,
    previous_questions: Option<Vec<i64>>,
}

#[derive(Serialize)]
struct QuizQuestion {
    success: bool,
    question: Option<Question>,
}

fn pick_random(candidates: Vec<Question>) -> Option<Question> {
    candidates.choose(&mut rand::thread_rng()).cloned()
}

async fn next_question(
    State(pool): State<SqlitePool>,
    JsonBody(request): JsonBody<QuizRequest>,
) -> ApiResponse<QuizQuestion> {
    let (Some(category), Some(previous)) = (request.quiz_category, request.previous_questions)
    else {
        return Err(ApiError::BadRequest);
    };

    let filter = (category.id != ALL_CATEGORIES).then_some(category.id);
    let candidates = get_quiz_candidates(&pool, filter, &previous).await?;
    let question = pick_random(candidates);

    match &question {
        Some(question) => {
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[category.id.to_string().as_str()])
                .inc();
            tracing::debug!("Quiz picked question {}", question.id);
        }
        None => tracing::debug!("Quiz on category {} has no questions left", category.id),
    }

    Ok(Json(QuizQuestion {
        success: true,
        question,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
