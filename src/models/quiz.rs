// src/models/quiz.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::question::QuestionResponse;

/// Represents the 'quizzes' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Row for the quiz list, joined with its question count.
#[derive(Debug, Serialize, FromRow)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub question_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A quiz with its questions in order, as served to the quiz page.
#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub id: i64,
    pub title: String,
    pub owner_id: i64,
    pub questions: Vec<QuestionResponse>,
}

/// DTO for creating an empty quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200, message = "Title length must be between 1 and 200 characters."))]
    pub title: String,
}
