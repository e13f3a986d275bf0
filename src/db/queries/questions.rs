use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::Window;

#[derive(Serialize, Deserialize, sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

// fields are not validated before insert; missing ones are rejected by the
// NOT NULL constraints of the table
#[derive(Debug, Default, Clone)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<i64>,
    pub difficulty: Option<i64>,
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
}

pub async fn get_questions(pool: &SqlitePool, window: Window) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty
        FROM questions ORDER BY id LIMIT ?1 OFFSET ?2
        "#,
    )
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(pool)
    .await
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_question(pool: &SqlitePool, new: &NewQuestion) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(new.question.as_deref())
    .bind(new.answer.as_deref())
    .bind(new.category)
    .bind(new.difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns the number of deleted rows.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<u64> {
    let mut conn = pool.acquire().await?;

    let affected = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?
    .rows_affected();
    Ok(affected)
}

pub async fn count_search_matches(pool: &SqlitePool, term: &str) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM questions WHERE question LIKE '%' || ?1 || '%'
        "#,
    )
    .bind(term)
    .fetch_one(pool)
    .await
}

// sqlite LIKE is case-insensitive for ASCII characters only
pub async fn search_questions(
    pool: &SqlitePool,
    term: &str,
    window: Window,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty
        FROM questions WHERE question LIKE '%' || ?1 || '%'
        ORDER BY id LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(term)
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(pool)
    .await
}

pub async fn count_questions_for_category(pool: &SqlitePool, category: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions WHERE category = ?1")
        .bind(category)
        .fetch_one(pool)
        .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: i64,
    window: Window,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty
        FROM questions WHERE category = ?1
        ORDER BY id LIMIT ?2 OFFSET ?3
        "#,
    )
    .bind(category)
    .bind(window.limit)
    .bind(window.offset)
    .fetch_all(pool)
    .await
}

/// Questions eligible for quiz play: every question when `category` is `None`,
/// otherwise those of that category, minus the ids in `exclude`.
pub async fn get_quiz_candidates(
    pool: &SqlitePool,
    category: Option<i64>,
    exclude: &[i64],
) -> sqlx::Result<Vec<Question>> {
    let questions = match category {
        Some(category) => {
            sqlx::query_as::<_, Question>(
                r#"
                SELECT id, question, answer, category, difficulty
                FROM questions WHERE category = ?1 ORDER BY id
                "#,
            )
            .bind(category)
            .fetch_all(pool)
            .await?
        }
        None => get_all_questions(pool).await?,
    };
    Ok(questions
        .into_iter()
        .filter(|q| !exclude.contains(&q.id))
        .collect())
}

/// Inserts the questions keeping their ids, replacing rows that already exist.
pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT(id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await
}
