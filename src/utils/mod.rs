// src/utils/mod.rs

pub mod answer_letter;
pub mod jwt;
pub mod password;
pub mod upload;
