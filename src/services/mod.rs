// src/services/mod.rs

//! Adapters for the collaborators the quiz core relies on but does not own:
//! a text generation model and document text extraction.

pub mod extractor;
pub mod generator;
