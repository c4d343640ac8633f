// src/engine/scorer.rs

use serde::{Deserialize, Serialize};

/// Correct option index for each question of a quiz, in question order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey {
    pub quiz_id: i64,
    pub correct_answers: Vec<usize>,
}

/// A user's answers, aligned positionally with the quiz's questions.
/// `None` means the question was left unanswered.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSubmission {
    pub quiz_id: i64,
    #[serde(default)]
    pub answers: Vec<Option<i64>>,
}

/// Result of scoring one submission. `score <= total_questions` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub score: i32,
    pub total_questions: i32,
}

impl Score {
    pub fn percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total_questions) * 100.0
    }
}

/// Two decimal places, the precision every reported percentage uses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("quiz {0} has no questions to score")]
    EmptyQuiz(i64),
}

/// Counts the positions where the submitted index equals the key.
///
/// Missing, out-of-range and extra answers never fail the call; they just
/// don't score. The total is always the number of questions in the key.
pub fn score(key: &AnswerKey, submission: &AnswerSubmission) -> Result<Score, ScoreError> {
    if key.correct_answers.is_empty() {
        return Err(ScoreError::EmptyQuiz(key.quiz_id));
    }

    let correct = key
        .correct_answers
        .iter()
        .enumerate()
        .filter(|(i, expected)| {
            submission
                .answers
                .get(*i)
                .copied()
                .flatten()
                .and_then(|given| usize::try_from(given).ok())
                .is_some_and(|given| given == **expected)
        })
        .count();

    Ok(Score {
        score: i32::try_from(correct).unwrap_or(i32::MAX),
        total_questions: i32::try_from(key.correct_answers.len()).unwrap_or(i32::MAX),
    })
}

/// Encouragement shown next to a result, banded by percentage.
pub fn feedback_for(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "Excellent! You've mastered this material!"
    } else if percentage >= 80.0 {
        "Great job! You have a strong understanding of the material."
    } else if percentage >= 70.0 {
        "Good work! You're on the right track."
    } else if percentage >= 60.0 {
        "Not bad! With a bit more study, you'll improve your score."
    } else {
        "Keep studying! Review the material and try again."
    }
}
