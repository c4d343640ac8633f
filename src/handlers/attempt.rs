// src/handlers/attempt.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;

use crate::{
    engine::{AnswerKey, AnswerSubmission, score},
    error::AppError,
    handlers::quiz::find_quiz,
    models::attempt::{QuizAttempt, SubmitQuizResponse},
    utils::{answer_letter::letter_to_index, jwt::Claims},
};

/// Builds the answer key for a quiz from its stored letters, in question order.
async fn load_answer_key(pool: &PgPool, quiz_id: i64) -> Result<AnswerKey, AppError> {
    let letters: Vec<(i64, String)> = sqlx::query_as(
        "SELECT id, correct_answer FROM questions WHERE quiz_id = $1 ORDER BY id",
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await?;

    let correct_answers = letters
        .into_iter()
        .map(|(id, letter)| {
            letter_to_index(&letter).ok_or_else(|| {
                AppError::InternalServerError(format!(
                    "Question {} has invalid answer letter '{}'",
                    id, letter
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnswerKey {
        quiz_id,
        correct_answers,
    })
}

/// Scores a submission against the quiz's answer key and records the attempt.
///
/// Unanswered, out-of-range and missing positions count as wrong.
/// A quiz with no questions cannot be scored.
pub async fn submit_attempt(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(submission): Json<AnswerSubmission>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    find_quiz(&pool, submission.quiz_id).await?;

    let key = load_answer_key(&pool, submission.quiz_id).await?;
    let result = score(&key, &submission)?;

    let attempt = sqlx::query_as::<_, QuizAttempt>(
        r#"
        INSERT INTO quiz_attempts (user_id, quiz_id, score, total_questions)
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, quiz_id, score, total_questions, completed_at
        "#,
    )
    .bind(user_id)
    .bind(submission.quiz_id)
    .bind(result.score)
    .bind(result.total_questions)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to record attempt: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!(
        "User {} scored {}/{} on quiz {}",
        user_id,
        attempt.score,
        attempt.total_questions,
        attempt.quiz_id
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitQuizResponse::new(attempt.id, result)),
    ))
}

/// Loads every attempt the user has made.
pub(crate) async fn attempts_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<QuizAttempt>, AppError> {
    let attempts = sqlx::query_as::<_, QuizAttempt>(
        r#"
        SELECT id, user_id, quiz_id, score, total_questions, completed_at
        FROM quiz_attempts
        WHERE user_id = $1
        ORDER BY completed_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(attempts)
}

/// Lists the caller's attempts, newest first.
pub async fn list_attempts(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = attempts_for_user(&pool, claims.user_id()?).await?;
    Ok(Json(attempts))
}
