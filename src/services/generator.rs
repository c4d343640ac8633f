// src/services/generator.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{Config, MAX_MATERIAL_CHARS, TARGET_QUESTION_RANGE};

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no API key configured for the text generator")]
    NotConfigured,

    #[error("generator request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("generator returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generator returned no text")]
    EmptyResponse,
}

/// Produces free text from a prompt.
///
/// Output is untrusted: it may not follow the requested format at all.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Builds the prompt sent to the model. The format it asks for is the one the
/// delimited grammar parser reads.
pub fn build_prompt(material: &str) -> String {
    let (min, max) = TARGET_QUESTION_RANGE;
    let material: String = material.trim().chars().take(MAX_MATERIAL_CHARS).collect();

    format!(
        "Create between {min} and {max} multiple choice questions from the study material below.\n\
         Each question must have exactly four answer options.\n\
         Write each question as: question text ; option, option, option, option\n\
         Mark the single correct option by ending it with an asterisk (*).\n\
         Separate questions with a pipe (|). Do not use commas, semicolons, pipes or asterisks \
         anywhere else, and reply with the questions only.\n\n\
         Study material:\n{material}"
    )
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Talks to an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatCompletionsGenerator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl ChatCompletionsGenerator {
    pub fn new(
        base_url: &Url,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = format!("{}/chat/completions", base_url.as_str().trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint,
            api_key,
            model,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GenerationError> {
        Self::new(
            &config.generator_api_url,
            config.generator_api_key.clone(),
            config.generator_model.clone(),
            Duration::from_secs(config.generator_timeout_secs),
        )
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::NotConfigured)?;

        let payload = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let body: ChatResponse = res.json().await?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_material_and_format() {
        let prompt = build_prompt("  Photosynthesis converts light to energy.  ");
        assert!(prompt.contains("between 3 and 5"));
        assert!(prompt.ends_with("Photosynthesis converts light to energy."));
        assert!(prompt.contains("asterisk"));
    }

    #[test]
    fn test_prompt_truncates_long_material() {
        let material = "x".repeat(MAX_MATERIAL_CHARS + 500);
        let prompt = build_prompt(&material);
        let tail = prompt.rsplit('\n').next().unwrap();
        assert_eq!(tail.len(), MAX_MATERIAL_CHARS);
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let url = Url::parse("https://llm.example.com/v1/").unwrap();
        let generator =
            ChatCompletionsGenerator::new(&url, None, "m".into(), Duration::from_secs(1)).unwrap();
        assert_eq!(generator.endpoint, "https://llm.example.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let url = Url::parse("https://llm.example.com/v1").unwrap();
        let generator =
            ChatCompletionsGenerator::new(&url, None, "m".into(), Duration::from_secs(1)).unwrap();
        let err = generator.generate("prompt").await.unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured));
    }
}
