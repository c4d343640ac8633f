// tests/engine_tests.rs

use chrono::{TimeZone, Utc};
use quizgen::{
    engine::{
        AnswerKey, AnswerSubmission, AssemblyError, AttemptRecord, DelimitedGrammar,
        QuestionParser, Rejection, RejectionReason, assemble, questions_from_text, score,
        summarize,
    },
};

#[test]
fn well_formed_text_yields_one_question_per_block_in_order() {
    let raw = "What is the capital of France? ; London, Berlin, Paris*, Rome \
               | What is 2+2? ; 3, 4*, 5, 6 \
               | Which is a mammal? ; Whale*, Shark, Trout, Eel";

    let quiz = questions_from_text(&DelimitedGrammar, raw).unwrap();

    assert!(quiz.rejected.is_empty());
    assert!(quiz.malformed.is_empty());
    let answers: Vec<usize> = quiz.accepted.iter().map(|q| q.correct_answer()).collect();
    assert_eq!(answers, vec![2, 1, 0]);
    assert_eq!(quiz.accepted[1].question_text(), "What is 2+2?");
}

#[test]
fn end_to_end_single_block() {
    let quiz = questions_from_text(&DelimitedGrammar, "Cap of France? ; Paris*, Rome, Berlin, Madrid").unwrap();

    assert_eq!(quiz.accepted.len(), 1);
    let question = &quiz.accepted[0];
    assert_eq!(question.options(), &["Paris", "Rome", "Berlin", "Madrid"].map(String::from));
    assert_eq!(question.correct_answer(), 0);
}

#[test]
fn zero_or_two_markers_are_always_ambiguous_or_missing() {
    for raw in ["Q ; a, b, c, d", "Q ; a*, b*, c, d", "Q ; a, b, c*, d*"] {
        let AssemblyError::NoValidQuestions { rejected, .. } =
            assemble(DelimitedGrammar.parse(raw)).unwrap_err();
        assert!(
            matches!(rejected[0].reason, RejectionReason::AmbiguousOrMissingAnswer(n) if n != 1),
            "{raw}"
        );
    }
}

#[test]
fn option_count_other_than_four_is_always_wrong_count() {
    for raw in ["Q ; a*", "Q ; a, b*, c", "Q ; a*, b*, c, d, e", "Q ; a, b, c, d, e, f"] {
        let AssemblyError::NoValidQuestions { rejected, .. } =
            assemble(DelimitedGrammar.parse(raw)).unwrap_err();
        assert!(
            matches!(rejected[0].reason, RejectionReason::WrongOptionCount(n) if n != 4),
            "{raw}"
        );
    }
}

#[test]
fn comma_inside_option_breaks_the_block() {
    let quiz = questions_from_text(
        &DelimitedGrammar,
        "Pick one ; 1,000*, 10, 100, 1 | Fine ; a*, b, c, d",
    )
    .unwrap();

    assert_eq!(quiz.accepted.len(), 1);
    assert_eq!(quiz.rejected[0].reason, RejectionReason::WrongOptionCount(5));
}

#[test]
fn block_without_semicolon_means_no_valid_questions() {
    let err = questions_from_text(&DelimitedGrammar, "Bad block no semicolon").unwrap_err();
    assert_eq!(err.to_string(), "could not generate questions from this material");
}

#[test]
fn scoring_examples() {
    let key = AnswerKey {
        quiz_id: 3,
        correct_answers: vec![2, 0, 1],
    };
    let submit = |answers: Vec<Option<i64>>| AnswerSubmission { quiz_id: 3, answers };

    assert_eq!(score(&key, &submit(vec![Some(2), Some(0), Some(1)])).unwrap().score, 3);
    assert_eq!(score(&key, &submit(vec![Some(2), None, Some(0)])).unwrap().score, 1);

    let short = score(&key, &submit(vec![Some(2)])).unwrap();
    assert_eq!((short.score, short.total_questions), (1, 3));
}

#[test]
fn submission_deserializes_nulls_as_unanswered() {
    let submission: AnswerSubmission =
        serde_json::from_str(r#"{"quiz_id": 5, "answers": [1, null, 3]}"#).unwrap();
    assert_eq!(submission.answers, vec![Some(1), None, Some(3)]);
}

#[test]
fn analytics_average_and_best() {
    let attempt = |day: u32, score: i32, total: i32| AttemptRecord {
        quiz_id: 1,
        score,
        total_questions: total,
        completed_at: Utc.with_ymd_and_hms(2025, 1, day, 9, 30, 0).unwrap(),
    };

    let summary = summarize(&[attempt(1, 1, 2), attempt(2, 2, 2)], |_| None);

    assert_eq!(summary.average_score_percent, 75.0);
    assert_eq!(summary.best_score_percent, 100.0);
    assert_eq!(summary.time_series[0].quiz_name, "Quiz 1");
    assert_eq!(summary.time_series[1].raw_score, "2/2");
}

#[test]
fn analytics_ties_keep_submission_order() {
    let at = Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap();
    let attempt = |quiz_id: i64| AttemptRecord {
        quiz_id,
        score: 1,
        total_questions: 1,
        completed_at: at,
    };

    let summary = summarize(&[attempt(20), attempt(10)], |_| None);

    let names: Vec<&str> = summary.time_series.iter().map(|p| p.quiz_name.as_str()).collect();
    assert_eq!(names, vec!["Quiz 20", "Quiz 10"]);
}

#[test]
fn dropped_and_rejected_blocks_are_numbered_alike() {
    let quiz = questions_from_text(&DelimitedGrammar, "bad | Q ; a, b | Q2 ; a*, b, c, d").unwrap();

    assert_eq!(quiz.malformed[0].block, 1);
    assert_eq!(
        quiz.rejected,
        vec![Rejection {
            block: 2,
            reason: RejectionReason::WrongOptionCount(2),
        }]
    );
    assert_eq!(quiz.blocks_seen(), 3);
}
