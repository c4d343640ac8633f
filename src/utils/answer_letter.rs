// src/utils/answer_letter.rs

//! Stored questions record the correct option as a letter. The engine and
//! the JSON API only speak zero-based indices; conversion happens here.

use crate::engine::OPTION_COUNT;

const FIRST_LETTER: u8 = b'A';

/// `0 -> "A"`, ..., `3 -> "D"`.
pub fn index_to_letter(index: usize) -> Option<String> {
    if index >= OPTION_COUNT {
        return None;
    }
    let offset = u8::try_from(index).ok()?;
    Some(char::from(FIRST_LETTER + offset).to_string())
}

/// `"A" -> 0`, ..., `"D" -> 3`. Lowercase and surrounding whitespace are tolerated.
pub fn letter_to_index(letter: &str) -> Option<usize> {
    let mut chars = letter.trim().chars();
    let c = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !c.is_ascii_uppercase() {
        return None;
    }
    let index = usize::from(c as u8 - FIRST_LETTER);
    (index < OPTION_COUNT).then_some(index)
}
