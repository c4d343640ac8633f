// src/handlers/generation.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use sqlx::PgPool;

use crate::{
    engine::{AssembledQuiz, AssemblyError, MalformedBlock, Question, QuestionParser, Rejection, questions_from_text},
    error::AppError,
    handlers::quiz::{insert_questions, owned_quiz},
    models::question::QuestionResponse,
    services::{
        extractor::TextExtractor,
        generator::{TextGenerator, build_prompt},
    },
    utils::{
        jwt::Claims,
        upload::{MaterialKind, MaterialUpload},
    },
};

/// Outcome of a generation run: what was accepted and what was dropped.
#[derive(Debug, Serialize)]
pub struct GenerationReport<T> {
    pub questions: Vec<T>,
    pub blocks_seen: usize,
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
    pub malformed: Vec<MalformedBlock>,
}

impl<T> GenerationReport<T> {
    fn new(quiz: AssembledQuiz, questions: Vec<T>) -> Self {
        Self {
            blocks_seen: quiz.blocks_seen(),
            accepted: quiz.accepted.len(),
            rejected: quiz.rejected,
            malformed: quiz.malformed,
            questions,
        }
    }
}

/// Collects study material from the form: the `study_material` text field
/// and/or an uploaded `file`.
async fn read_material(
    mut multipart: Multipart,
    extractor: &dyn TextExtractor,
) -> Result<String, AppError> {
    let mut typed: Option<String> = None;
    let mut upload: Option<MaterialUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "study_material" => typed = Some(field.text().await?),
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                // An untouched file input still submits an empty part.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                let kind = MaterialKind::sniff(&file_name).ok_or_else(|| {
                    AppError::BadRequest(format!("Unsupported file type: '{}'", file_name))
                })?;
                upload = Some(MaterialUpload {
                    file_name,
                    kind,
                    bytes: bytes.to_vec(),
                });
            }
            other => tracing::debug!("Ignoring form field '{}'", other),
        }
    }

    let mut parts = Vec::new();

    if let Some(text) = typed.filter(|t| !t.trim().is_empty()) {
        parts.push(text);
    }

    if let Some(upload) = upload {
        match extractor.extract_text(&upload).await? {
            Some(text) if !text.trim().is_empty() => parts.push(text),
            _ if parts.is_empty() => {
                return Err(AppError::BadRequest(format!(
                    "Could not read any text from '{}'",
                    upload.file_name
                )));
            }
            _ => tracing::warn!("No text extracted from '{}', using typed material only", upload.file_name),
        }
    }

    if parts.is_empty() {
        return Err(AppError::BadRequest("No study material provided".to_string()));
    }

    Ok(parts.join("\n\n"))
}

/// Prompts the model with the material and runs the text through the parser,
/// validator and assembler.
async fn generate_questions(
    generator: &dyn TextGenerator,
    parser: &dyn QuestionParser,
    material: &str,
) -> Result<AssembledQuiz, AppError> {
    let raw = generator.generate(&build_prompt(material)).await?;

    let quiz = questions_from_text(parser, &raw).map_err(|e| {
        let AssemblyError::NoValidQuestions { rejected, malformed } = &e;
        tracing::warn!(
            "Generation produced no valid questions ({} rejected, {} malformed)",
            rejected.len(),
            malformed.len()
        );
        e
    })?;

    tracing::info!(
        "Generated {} question(s) from {} block(s)",
        quiz.accepted.len(),
        quiz.blocks_seen()
    );

    Ok(quiz)
}

/// Generates questions without saving them, for guests and previews.
pub async fn preview_questions(
    State(generator): State<Arc<dyn TextGenerator>>,
    State(extractor): State<Arc<dyn TextExtractor>>,
    State(parser): State<Arc<dyn QuestionParser>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let material = read_material(multipart, extractor.as_ref()).await?;
    let quiz = generate_questions(generator.as_ref(), parser.as_ref(), &material).await?;

    let questions: Vec<Question> = quiz.accepted.clone();

    Ok(Json(GenerationReport::new(quiz, questions)))
}

/// Generates questions and appends the accepted ones to a quiz the caller owns.
pub async fn generate_into_quiz(
    State(pool): State<PgPool>,
    State(generator): State<Arc<dyn TextGenerator>>,
    State(extractor): State<Arc<dyn TextExtractor>>,
    State(parser): State<Arc<dyn QuestionParser>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    owned_quiz(&pool, id, claims.user_id()?).await?;

    let material = read_material(multipart, extractor.as_ref()).await?;
    let quiz = generate_questions(generator.as_ref(), parser.as_ref(), &material).await?;

    let saved: Vec<QuestionResponse> = insert_questions(&pool, id, &quiz.accepted).await?;

    Ok((StatusCode::CREATED, Json(GenerationReport::new(quiz, saved))))
}
