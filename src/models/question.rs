// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use crate::{
    engine::{CandidateQuestion, OPTION_COUNT},
    error::AppError,
    utils::answer_letter::letter_to_index,
};

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuestionRow {
    pub id: i64,
    pub quiz_id: i64,

    pub question_text: String,

    /// Exactly four options, stored as a JSON array.
    pub options: Json<Vec<String>>,

    /// Correct option as a letter, 'A' to 'D'.
    pub correct_answer: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Question as served by the quiz read endpoint.
#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: i64,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

impl TryFrom<QuestionRow> for QuestionResponse {
    type Error = AppError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let correct_answer_index = letter_to_index(&row.correct_answer).ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Question {} has invalid answer letter '{}'",
                row.id, row.correct_answer
            ))
        })?;

        Ok(QuestionResponse {
            id: row.id,
            question_text: row.question_text,
            options: row.options.0,
            correct_answer_index,
        })
    }
}

/// DTO for manually saving one question into a quiz.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question_text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    pub correct_index: i64,
}

impl SaveQuestionRequest {
    /// Feeds the request through the same validator generated questions go through.
    ///
    /// The index must name one of the four option slots; anything else is a
    /// client error in its own right rather than a missing answer.
    pub fn into_candidate(self) -> Result<CandidateQuestion, AppError> {
        let index = usize::try_from(self.correct_index)
            .ok()
            .filter(|index| *index < OPTION_COUNT)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "correct_index must be between 0 and {}, got {}",
                    OPTION_COUNT - 1,
                    self.correct_index
                ))
            })?;

        Ok(CandidateQuestion {
            block: 1,
            question_text: self.question_text,
            options: self.options,
            correct_indices: vec![index],
        })
    }
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() > OPTION_COUNT * 2 {
        return Err(validator::ValidationError::new("too_many_options"));
    }
    for opt in options {
        if opt.len() > 500 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(correct_index: i64) -> SaveQuestionRequest {
        SaveQuestionRequest {
            question_text: "Largest planet?".to_string(),
            options: vec!["Mars".into(), "Jupiter".into(), "Venus".into(), "Earth".into()],
            correct_index,
        }
    }

    fn row(letter: &str) -> QuestionRow {
        QuestionRow {
            id: 7,
            quiz_id: 1,
            question_text: "Largest planet?".to_string(),
            options: Json(vec!["Mars".into(), "Jupiter".into(), "Venus".into(), "Earth".into()]),
            correct_answer: letter.to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_row_letter_becomes_index() {
        let response = QuestionResponse::try_from(row("B")).unwrap();
        assert_eq!(response.correct_answer_index, 1);
        assert_eq!(response.options[1], "Jupiter");
    }

    #[test]
    fn test_row_with_bad_letter_is_internal_error() {
        let err = QuestionResponse::try_from(row("Z")).unwrap_err();
        assert!(matches!(err, AppError::InternalServerError(_)));
    }

    #[test]
    fn test_into_candidate_marks_single_index() {
        let candidate = request(1).into_candidate().unwrap();
        assert_eq!(candidate.correct_indices, vec![1]);
        assert_eq!(candidate.options.len(), 4);
    }

    #[test]
    fn test_out_of_range_index_is_bad_request() {
        for index in [-1, 4, 99] {
            match request(index).into_candidate() {
                Err(AppError::BadRequest(msg)) => {
                    assert_eq!(
                        msg,
                        format!("correct_index must be between 0 and 3, got {}", index)
                    );
                }
                other => panic!("expected BadRequest for {}, got {:?}", index, other),
            }
        }
    }

    #[test]
    fn test_last_slot_is_in_range() {
        let candidate = request(3).into_candidate().unwrap();
        assert_eq!(candidate.correct_indices, vec![3]);
    }

    #[test]
    fn test_overlong_option_fails_validation() {
        let mut req = request(0);
        req.options[2] = "x".repeat(501);
        assert!(req.validate().is_err());
    }
}
