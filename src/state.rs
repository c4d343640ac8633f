// src/state.rs

use std::sync::Arc;

use crate::config::Config;
use crate::engine::QuestionParser;
use crate::services::{extractor::TextExtractor, generator::TextGenerator};
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub generator: Arc<dyn TextGenerator>,
    pub extractor: Arc<dyn TextExtractor>,
    pub parser: Arc<dyn QuestionParser>,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn TextGenerator> {
    fn from_ref(state: &AppState) -> Self {
        state.generator.clone()
    }
}

impl FromRef<AppState> for Arc<dyn TextExtractor> {
    fn from_ref(state: &AppState) -> Self {
        state.extractor.clone()
    }
}

impl FromRef<AppState> for Arc<dyn QuestionParser> {
    fn from_ref(state: &AppState) -> Self {
        state.parser.clone()
    }
}
