// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::engine::{AttemptRecord, Score, feedback_for, round2};

/// Represents the 'quiz_attempts' table in the database.
/// Rows are written once and never updated.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub completed_at: chrono::DateTime<chrono::Utc>,
}

impl From<&QuizAttempt> for AttemptRecord {
    fn from(attempt: &QuizAttempt) -> Self {
        AttemptRecord {
            quiz_id: attempt.quiz_id,
            score: attempt.score,
            total_questions: attempt.total_questions,
            completed_at: attempt.completed_at,
        }
    }
}

/// Response for a scored submission.
#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub attempt_id: i64,
    pub score: i32,
    pub total: i32,
    pub percentage: f64,
    pub feedback: &'static str,
}

impl SubmitQuizResponse {
    /// Feedback is banded on the exact ratio; the reported percentage is rounded.
    pub fn new(attempt_id: i64, result: Score) -> Self {
        let percentage = result.percentage();

        SubmitQuizResponse {
            attempt_id,
            score: result.score,
            total: result.total_questions,
            percentage: round2(percentage),
            feedback: feedback_for(percentage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_rounds_percentage() {
        let response = SubmitQuizResponse::new(
            4,
            Score {
                score: 1,
                total_questions: 3,
            },
        );

        assert_eq!(response.attempt_id, 4);
        assert_eq!(response.percentage, 33.33);
        assert_eq!(response.feedback, "Keep studying! Review the material and try again.");
    }

    #[test]
    fn test_response_feedback_for_perfect_score() {
        let response = SubmitQuizResponse::new(
            1,
            Score {
                score: 5,
                total_questions: 5,
            },
        );

        assert_eq!(response.percentage, 100.0);
        assert_eq!(response.feedback, "Excellent! You've mastered this material!");
    }

    #[test]
    fn test_attempt_row_to_record() {
        let row = QuizAttempt {
            id: 9,
            user_id: 2,
            quiz_id: 5,
            score: 3,
            total_questions: 4,
            completed_at: chrono::Utc::now(),
        };

        let record = AttemptRecord::from(&row);
        assert_eq!((record.quiz_id, record.score, record.total_questions), (5, 3, 4));
        assert_eq!(record.completed_at, row.completed_at);
    }
}
