// src/engine/mod.rs

//! Pure quiz logic: turning generated text into validated questions, scoring
//! submissions and summarizing attempt history.
//!
//! Nothing in here performs I/O. Handlers fetch rows and call collaborators,
//! then hand already-materialized values to these functions.

pub mod analytics;
pub mod assembler;
pub mod parser;
pub mod scorer;
pub mod validator;

pub use analytics::{AnalyticsSummary, AttemptRecord, QuizStats, SeriesPoint, summarize};
pub use assembler::{AssembledQuiz, AssemblyError, Rejection, Verdict, assemble, judge, questions_from_text};
pub use parser::{CandidateQuestion, DelimitedGrammar, MalformedBlock, MalformedReason, ParseReport, QuestionParser};
pub use scorer::{AnswerKey, AnswerSubmission, Score, ScoreError, feedback_for, round2, score};
pub use validator::{OPTION_COUNT, Question, RejectionReason, validate};
