// src/engine/parser.rs

use serde::Serialize;

/// Separates one question block from the next.
pub const BLOCK_DELIMITER: char = '|';
/// Separates the question text from its answers (first occurrence only).
pub const QUESTION_DELIMITER: char = ';';
/// Separates answer options.
pub const OPTION_DELIMITER: char = ',';
/// Trailing marker on the correct option.
pub const CORRECT_MARKER: char = '*';

/// A parsed but not yet validated question.
///
/// The option count is whatever the block contained; the validator decides
/// whether the candidate becomes a `Question`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuestion {
    /// 1-based block number, counted the same way as [`MalformedBlock::block`].
    pub block: usize,
    pub question_text: String,
    pub options: Vec<String>,
    /// Positions (0-based) of every option carrying the correct marker.
    pub correct_indices: Vec<usize>,
}

/// Why a block was dropped before it could become a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedReason {
    MissingSeparator,
    EmptyQuestion,
}

/// A dropped block. `block` is the 1-based position among non-empty blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedBlock {
    pub block: usize,
    pub reason: MalformedReason,
}

/// Everything a parse produced: the candidates in source order plus the
/// blocks that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub candidates: Vec<CandidateQuestion>,
    pub malformed: Vec<MalformedBlock>,
}

/// Turns raw generated text into candidate questions.
///
/// Validation and assembly only ever see `CandidateQuestion`s, so a stricter
/// output format can replace the delimiter grammar by implementing this trait.
pub trait QuestionParser: Send + Sync {
    fn parse(&self, raw: &str) -> ParseReport;
}

/// The pipe/semicolon/comma grammar used by the generation prompt:
///
/// `question ; option, option*, option, option | question ; ...`
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedGrammar;

impl QuestionParser for DelimitedGrammar {
    fn parse(&self, raw: &str) -> ParseReport {
        let mut report = ParseReport::default();

        // Stray pipes leave empty blocks behind; they are not malformed.
        let blocks = raw
            .split(BLOCK_DELIMITER)
            .map(str::trim)
            .filter(|block| !block.is_empty());

        for (number, block) in (1..).zip(blocks) {
            match parse_block(number, block) {
                Ok(candidate) => report.candidates.push(candidate),
                Err(reason) => report.malformed.push(MalformedBlock {
                    block: number,
                    reason,
                }),
            }
        }

        report
    }
}

fn parse_block(number: usize, block: &str) -> Result<CandidateQuestion, MalformedReason> {
    let (question_part, answers_part) = block
        .split_once(QUESTION_DELIMITER)
        .ok_or(MalformedReason::MissingSeparator)?;

    let question_text = question_part.trim();
    if question_text.is_empty() {
        return Err(MalformedReason::EmptyQuestion);
    }

    let mut options = Vec::new();
    let mut correct_indices = Vec::new();

    for (index, raw_option) in answers_part.split(OPTION_DELIMITER).enumerate() {
        let option = raw_option.trim();
        match option.strip_suffix(CORRECT_MARKER) {
            Some(stripped) => {
                correct_indices.push(index);
                options.push(stripped.trim_end().to_string());
            }
            None => options.push(option.to_string()),
        }
    }

    Ok(CandidateQuestion {
        block: number,
        question_text: question_text.to_string(),
        options,
        correct_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ParseReport {
        DelimitedGrammar.parse(raw)
    }

    #[test]
    fn test_parse_two_blocks_in_order() {
        let report = parse(
            "What is the capital of France? ; London, Berlin, Paris*, Rome | What is 2+2? ; 3, 4*, 5, 6",
        );

        assert!(report.malformed.is_empty());
        assert_eq!(report.candidates.len(), 2);

        let first = &report.candidates[0];
        assert_eq!(first.question_text, "What is the capital of France?");
        assert_eq!(first.options, vec!["London", "Berlin", "Paris", "Rome"]);
        assert_eq!(first.correct_indices, vec![2]);

        let second = &report.candidates[1];
        assert_eq!(second.question_text, "What is 2+2?");
        assert_eq!(second.correct_indices, vec![1]);
    }

    #[test]
    fn test_marker_with_whitespace_before_it() {
        let report = parse("Q? ; a, b , c *, d");
        let candidate = &report.candidates[0];
        assert_eq!(candidate.options, vec!["a", "b", "c", "d"]);
        assert_eq!(candidate.correct_indices, vec![2]);
    }

    #[test]
    fn test_only_one_trailing_marker_is_stripped() {
        let report = parse("Q? ; a**, b, c, d");
        let candidate = &report.candidates[0];
        assert_eq!(candidate.options[0], "a*");
        assert_eq!(candidate.correct_indices, vec![0]);
    }

    #[test]
    fn test_asterisk_inside_option_is_not_a_marker() {
        let report = parse("Q? ; 2*3, 6*, 5, 1");
        let candidate = &report.candidates[0];
        assert_eq!(candidate.options[0], "2*3");
        assert_eq!(candidate.correct_indices, vec![1]);
    }

    #[test]
    fn test_missing_semicolon_is_malformed() {
        let report = parse("Bad block no semicolon");
        assert!(report.candidates.is_empty());
        assert_eq!(
            report.malformed,
            vec![MalformedBlock {
                block: 1,
                reason: MalformedReason::MissingSeparator
            }]
        );
    }

    #[test]
    fn test_empty_question_is_malformed() {
        let report = parse("   ; a*, b, c, d");
        assert!(report.candidates.is_empty());
        assert_eq!(report.malformed[0].reason, MalformedReason::EmptyQuestion);
    }

    #[test]
    fn test_bad_block_does_not_abort_others() {
        let report = parse("no separator here | Q? ; a*, b, c, d");
        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.malformed.len(), 1);
        assert_eq!(report.malformed[0].block, 1);
        assert_eq!(report.candidates[0].block, 2);
    }

    #[test]
    fn test_block_numbers_skip_empty_blocks() {
        let report = parse("| A? ; a*, b, c, d || B? ; a, b*, c, d");
        let numbers: Vec<usize> = report.candidates.iter().map(|c| c.block).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_stray_pipes_are_dropped_silently() {
        let report = parse("| Q? ; a*, b, c, d |  | ");
        assert_eq!(report.candidates.len(), 1);
        assert!(report.malformed.is_empty());
    }

    #[test]
    fn test_only_first_semicolon_splits() {
        let report = parse("Q? ; a; x*, b, c, d");
        let candidate = &report.candidates[0];
        assert_eq!(candidate.options[0], "a; x");
        assert_eq!(candidate.correct_indices, vec![0]);
    }

    #[test]
    fn test_option_count_is_observed_not_enforced() {
        let report = parse("Q? ; a*, b, c, d, e");
        assert_eq!(report.candidates[0].options.len(), 5);
    }

    #[test]
    fn test_duplicate_options_are_kept() {
        let report = parse("Q? ; a, a, a*, a");
        assert_eq!(report.candidates[0].options, vec!["a", "a", "a", "a"]);
    }
}
