// src/handlers/analytics.rs

use std::collections::HashMap;

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{
    engine::{AttemptRecord, summarize},
    error::AppError,
    handlers::attempt::attempts_for_user,
    utils::jwt::Claims,
};

/// Score history and statistics for the caller, recomputed on every request.
pub async fn get_analytics(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let attempts = attempts_for_user(&pool, claims.user_id()?).await?;

    let mut quiz_ids: Vec<i64> = attempts.iter().map(|a| a.quiz_id).collect();
    quiz_ids.sort_unstable();
    quiz_ids.dedup();

    // Deleted quizzes simply don't come back; the summary labels them by id.
    let names: HashMap<i64, String> = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, title FROM quizzes WHERE id = ANY($1)",
    )
    .bind(&quiz_ids)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to resolve quiz names: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .into_iter()
    .collect();

    let records: Vec<AttemptRecord> = attempts.iter().map(AttemptRecord::from).collect();
    let summary = summarize(&records, |id| names.get(&id).cloned());

    Ok(Json(summary))
}
