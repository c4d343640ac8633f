// src/engine/validator.rs

use serde::Serialize;

use super::parser::CandidateQuestion;

/// Every accepted question has exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// A question that passed validation.
///
/// Fields are private: the only way to obtain one is through [`validate`],
/// so `correct_answer` always points at one of the four options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    question_text: String,
    options: [String; OPTION_COUNT],
    #[serde(rename = "correct_answer_index")]
    correct_answer: usize,
}

impl Question {
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// Zero-based index into `options`.
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }
}

/// Why a candidate was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RejectionReason {
    #[error("question text is empty")]
    EmptyQuestion,

    #[error("expected 4 options, found {0}")]
    WrongOptionCount(usize),

    /// Zero marked means missing, more than one means ambiguous.
    #[error("expected exactly one correct option, found {0}")]
    AmbiguousOrMissingAnswer(usize),

    #[error("option {0} is empty")]
    EmptyOption(usize),
}

/// Checks a single candidate. Rules run in a fixed order and the first
/// failure is reported.
pub fn validate(candidate: CandidateQuestion) -> Result<Question, RejectionReason> {
    let CandidateQuestion {
        question_text,
        options,
        correct_indices,
        ..
    } = candidate;

    let question_text = question_text.trim();
    if question_text.is_empty() {
        return Err(RejectionReason::EmptyQuestion);
    }

    if options.len() != OPTION_COUNT {
        return Err(RejectionReason::WrongOptionCount(options.len()));
    }

    let correct_answer = match correct_indices.as_slice() {
        [index] if *index < OPTION_COUNT => *index,
        _ => return Err(RejectionReason::AmbiguousOrMissingAnswer(correct_indices.len())),
    };

    if let Some(position) = options.iter().position(|o| o.trim().is_empty()) {
        return Err(RejectionReason::EmptyOption(position));
    }

    let options: [String; OPTION_COUNT] = options
        .into_iter()
        .map(|o| o.trim().to_string())
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|rest: Vec<String>| RejectionReason::WrongOptionCount(rest.len()))?;

    Ok(Question {
        question_text: question_text.to_string(),
        options,
        correct_answer,
    })
}
