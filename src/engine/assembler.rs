// src/engine/assembler.rs

use serde::Serialize;

use super::{
    parser::{CandidateQuestion, MalformedBlock, ParseReport, QuestionParser},
    validator::{Question, RejectionReason, validate},
};

/// A rejected candidate. `block` numbers blocks the same way malformed
/// blocks are numbered, so both lists point into the same text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub block: usize,
    pub reason: RejectionReason,
}

/// Outcome of validating one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(Question),
    Rejected(Rejection),
}

/// The questions that survived, plus an account of everything that didn't.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssembledQuiz {
    pub accepted: Vec<Question>,
    pub rejected: Vec<Rejection>,
    /// Blocks the parser dropped before validation.
    pub malformed: Vec<MalformedBlock>,
}

impl AssembledQuiz {
    /// Number of blocks the generated text contained.
    pub fn blocks_seen(&self) -> usize {
        self.accepted.len() + self.rejected.len() + self.malformed.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssemblyError {
    /// Nothing usable came out of the text. Worth retrying with a new prompt
    /// or different material.
    #[error("could not generate questions from this material")]
    NoValidQuestions {
        rejected: Vec<Rejection>,
        malformed: Vec<MalformedBlock>,
    },
}

/// Validates every candidate independently, keeping source order.
pub fn judge(candidates: &[CandidateQuestion]) -> Vec<Verdict> {
    candidates
        .iter()
        .cloned()
        .map(|candidate| {
            let block = candidate.block;
            match validate(candidate) {
                Ok(question) => Verdict::Accepted(question),
                Err(reason) => {
                    tracing::debug!("Discarding block {}: {}", block, reason);
                    Verdict::Rejected(Rejection { block, reason })
                }
            }
        })
        .collect()
}

/// Partitions the parsed candidates into accepted questions and rejections,
/// carrying the parser's malformed blocks along.
///
/// Succeeds when at least one question is accepted; there is no other lower
/// or upper bound on the count.
pub fn assemble(report: ParseReport) -> Result<AssembledQuiz, AssemblyError> {
    let ParseReport {
        candidates,
        malformed,
    } = report;

    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for verdict in judge(&candidates) {
        match verdict {
            Verdict::Accepted(question) => accepted.push(question),
            Verdict::Rejected(rejection) => rejected.push(rejection),
        }
    }

    if accepted.is_empty() {
        return Err(AssemblyError::NoValidQuestions {
            rejected,
            malformed,
        });
    }

    Ok(AssembledQuiz {
        accepted,
        rejected,
        malformed,
    })
}

/// Runs the whole pipeline: parse, validate, assemble.
pub fn questions_from_text(
    parser: &dyn QuestionParser,
    raw: &str,
) -> Result<AssembledQuiz, AssemblyError> {
    assemble(parser.parse(raw))
}
