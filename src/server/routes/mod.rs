mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use axum::Json;
use serde::Deserialize;

use super::{deserializers::deserialize_page, error::ApiError};
use crate::db::Window;

pub const QUESTIONS_PER_PAGE: i64 = 10;

pub type ApiResponse<T> = Result<Json<T>, ApiError>;

#[derive(Deserialize, Debug)]
pub struct Pagination {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

impl Pagination {
    /// The store window for this page, `None` when the page can hold no rows.
    pub fn window(&self) -> Option<Window> {
        if self.page < 1 {
            return None;
        }
        let offset = (self.page - 1).checked_mul(QUESTIONS_PER_PAGE)?;
        Some(Window {
            limit: QUESTIONS_PER_PAGE,
            offset,
        })
    }
}
