// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    engine::{Question, validate},
    error::AppError,
    models::{
        question::{QuestionResponse, QuestionRow, SaveQuestionRequest},
        quiz::{CreateQuizRequest, Quiz, QuizResponse, QuizSummary},
    },
    utils::{answer_letter::index_to_letter, jwt::Claims},
};

/// Loads a quiz, 404 if it doesn't exist.
pub(crate) async fn find_quiz(pool: &PgPool, quiz_id: i64) -> Result<Quiz, AppError> {
    sqlx::query_as::<_, Quiz>("SELECT id, owner_id, title, created_at FROM quizzes WHERE id = $1")
        .bind(quiz_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))
}

/// Loads a quiz the caller owns. 404 if missing, 403 if it belongs to someone else.
pub(crate) async fn owned_quiz(pool: &PgPool, quiz_id: i64, user_id: i64) -> Result<Quiz, AppError> {
    let quiz = find_quiz(pool, quiz_id).await?;
    if quiz.owner_id != user_id {
        return Err(AppError::Forbidden("You do not own this quiz".to_string()));
    }
    Ok(quiz)
}

/// Persists validated questions in one transaction, keeping their order.
pub(crate) async fn insert_questions(
    pool: &PgPool,
    quiz_id: i64,
    questions: &[Question],
) -> Result<Vec<QuestionResponse>, AppError> {
    let mut tx = pool.begin().await?;
    let mut saved = Vec::with_capacity(questions.len());

    for question in questions {
        let letter = index_to_letter(question.correct_answer()).ok_or_else(|| {
            AppError::InternalServerError("Validated question has no answer letter".to_string())
        })?;

        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            INSERT INTO questions (quiz_id, question_text, options, correct_answer)
            VALUES ($1, $2, $3, $4)
            RETURNING id, quiz_id, question_text, options, correct_answer, created_at
            "#,
        )
        .bind(quiz_id)
        .bind(question.question_text())
        .bind(SqlJson(question.options().to_vec()))
        .bind(letter)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert question into quiz {}: {:?}", quiz_id, e);
            AppError::InternalServerError(e.to_string())
        })?;

        saved.push(QuestionResponse::try_from(row)?);
    }

    tx.commit().await?;

    Ok(saved)
}

/// Lists the caller's quizzes, newest first, with question counts.
pub async fn list_quizzes(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let quizzes = sqlx::query_as::<_, QuizSummary>(
        r#"
        SELECT q.id, q.title, COUNT(qs.id) AS question_count, q.created_at
        FROM quizzes q
        LEFT JOIN questions qs ON qs.quiz_id = q.id
        WHERE q.owner_id = $1
        GROUP BY q.id
        ORDER BY q.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(quizzes))
}

/// Creates an empty quiz owned by the caller.
pub async fn create_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let user_id = claims.user_id()?;

    let quiz = sqlx::query_as::<_, Quiz>(
        r#"
        INSERT INTO quizzes (owner_id, title)
        VALUES ($1, $2)
        RETURNING id, owner_id, title, created_at
        "#,
    )
    .bind(user_id)
    .bind(payload.title.trim())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create quiz: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Returns a quiz with its questions in order.
/// Stored answer letters are translated to zero-based indices.
pub async fn get_quiz(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = find_quiz(&pool, id).await?;

    let rows = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, quiz_id, question_text, options, correct_answer, created_at
        FROM questions
        WHERE quiz_id = $1
        ORDER BY id
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    let questions = rows
        .into_iter()
        .map(QuestionResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(QuizResponse {
        id: quiz.id,
        title: quiz.title,
        owner_id: quiz.owner_id,
        questions,
    }))
}

/// Deletes a quiz the caller owns. Its questions go with it.
pub async fn delete_quiz(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    owned_quiz(&pool, id, claims.user_id()?).await?;

    sqlx::query("DELETE FROM quizzes WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete quiz {}: {:?}", id, e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Saves one hand-picked question into a quiz the caller owns.
///
/// The request goes through the same validator as generated questions, so the
/// stored row always has four options and a single correct answer.
pub async fn save_question(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<SaveQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    owned_quiz(&pool, id, claims.user_id()?).await?;

    let question = validate(payload.into_candidate()?)
        .map_err(|reason| AppError::BadRequest(reason.to_string()))?;

    let mut saved = insert_questions(&pool, id, std::slice::from_ref(&question)).await?;
    let saved = saved
        .pop()
        .ok_or_else(|| AppError::InternalServerError("Question was not saved".to_string()))?;

    Ok((StatusCode::CREATED, Json(saved)))
}
