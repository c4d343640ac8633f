// src/engine/analytics.rs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::scorer::round2;

/// The parts of a recorded attempt the summary needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    pub quiz_id: i64,
    pub score: i32,
    pub total_questions: i32,
    pub completed_at: DateTime<Utc>,
}

/// One point of the score-over-time chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub score_percent: f64,
    pub quiz_name: String,
    /// `"score/total"`.
    pub raw_score: String,
}

/// Statistics for a single quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizStats {
    pub quiz_id: i64,
    pub quiz_name: String,
    pub attempts: usize,
    pub average_score_percent: f64,
    pub best_score_percent: f64,
    pub last_completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    pub total_attempts: usize,
    pub average_score_percent: f64,
    pub best_score_percent: f64,
    pub time_series: Vec<SeriesPoint>,
    pub per_quiz: Vec<QuizStats>,
}

/// Every attempt reaching here came out of the scorer, which refuses empty
/// quizzes, so `total_questions` is at least 1.
fn ratio_percent(attempt: &AttemptRecord) -> f64 {
    f64::from(attempt.score) / f64::from(attempt.total_questions.max(1)) * 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn best(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

/// Builds the summary from a user's attempt history.
///
/// `quiz_name` resolves quiz ids; quizzes that no longer exist are labelled
/// `"Quiz {id}"`.
pub fn summarize<F>(attempts: &[AttemptRecord], quiz_name: F) -> AnalyticsSummary
where
    F: Fn(i64) -> Option<String>,
{
    let resolve = |id: i64| quiz_name(id).unwrap_or_else(|| format!("Quiz {}", id));

    let mut ordered: Vec<&AttemptRecord> = attempts.iter().collect();
    // Stable: attempts completed at the same instant keep their input order.
    ordered.sort_by_key(|a| a.completed_at);

    let ratios: Vec<f64> = ordered.iter().map(|a| ratio_percent(a)).collect();

    let time_series = ordered
        .iter()
        .zip(&ratios)
        .map(|(a, ratio)| SeriesPoint {
            date: a.completed_at.date_naive(),
            score_percent: round2(*ratio),
            quiz_name: resolve(a.quiz_id),
            raw_score: format!("{}/{}", a.score, a.total_questions),
        })
        .collect();

    let mut by_quiz: BTreeMap<i64, (Vec<f64>, DateTime<Utc>)> = BTreeMap::new();
    for (a, ratio) in ordered.iter().zip(&ratios) {
        let entry = by_quiz
            .entry(a.quiz_id)
            .or_insert_with(|| (Vec::new(), a.completed_at));
        entry.0.push(*ratio);
        // `ordered` is ascending, so the last write is the latest attempt.
        entry.1 = a.completed_at;
    }

    let per_quiz = by_quiz
        .into_iter()
        .map(|(quiz_id, (quiz_ratios, last_completed_at))| QuizStats {
            quiz_id,
            quiz_name: resolve(quiz_id),
            attempts: quiz_ratios.len(),
            average_score_percent: round2(mean(&quiz_ratios)),
            best_score_percent: round2(best(&quiz_ratios)),
            last_completed_at,
        })
        .collect();

    AnalyticsSummary {
        total_attempts: attempts.len(),
        average_score_percent: round2(mean(&ratios)),
        best_score_percent: round2(best(&ratios)),
        time_series,
        per_quiz,
    }
}
