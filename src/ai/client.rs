//! Equation explanation through a hosted language model.

use crate::config::AiConfig;
use crate::error::ExplainError;
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::ChatMessage;
use serde::{Deserialize, Serialize};
use std::future::Future;

const SYSTEM_PROMPT: &str =
    "You are an expert math teacher who explains mathematical equations step by step.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub equation: String,
}

impl ExplainRequest {
    pub fn new(equation: impl Into<String>) -> Self {
        Self {
            equation: equation.into(),
        }
    }

    /// The user prompt sent to the model.
    pub fn prompt(&self) -> String {
        format!("Equation: {}\nExplanation:", self.equation)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

/// Anything that can turn an equation into a step-by-step explanation.
pub trait Explainer {
    fn explain(
        &self,
        request: ExplainRequest,
    ) -> impl Future<Output = Result<ExplainResponse, ExplainError>>;
}

/// Explainer backed by the `llm` crate. Named for the default Gemini
/// backend; any backend in [`AiConfig::backend`] works.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    /// Backend name, validated by [`parse_backend`] at construction.
    backend: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Check whether an API key is present for the configured backend.
    pub fn is_available(config: &AiConfig) -> bool {
        std::env::var(&config.api_key_env).is_ok_and(|key| !key.trim().is_empty())
    }

    pub fn from_config(config: &AiConfig) -> Result<Self, ExplainError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ExplainError::Unavailable(config.api_key_env.clone()))?;

        parse_backend(&config.backend)?;
        Ok(Self {
            backend: config.backend.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

fn parse_backend(name: &str) -> Result<LLMBackend, ExplainError> {
    match name.to_lowercase().as_str() {
        "google" | "gemini" => Ok(LLMBackend::Google),
        "openai" => Ok(LLMBackend::OpenAI),
        "anthropic" => Ok(LLMBackend::Anthropic),
        "ollama" => Ok(LLMBackend::Ollama),
        other => Err(ExplainError::Backend(format!("unsupported backend '{}'", other))),
    }
}

impl Explainer for GeminiClient {
    async fn explain(&self, request: ExplainRequest) -> Result<ExplainResponse, ExplainError> {
        if request.equation.trim().is_empty() {
            return Err(ExplainError::EmptyEquation);
        }

        let provider = LLMBuilder::new()
            .backend(parse_backend(&self.backend)?)
            .api_key(self.api_key.clone())
            .model(self.model.clone())
            .system(SYSTEM_PROMPT)
            .build()
            .map_err(|e| ExplainError::Backend(e.to_string()))?;

        let messages = vec![ChatMessage::user().content(request.prompt()).build()];

        tracing::info!(model = %self.model, equation = %request.equation, "requesting explanation");
        let response = provider
            .chat(&messages)
            .await
            .map_err(|e| ExplainError::Backend(e.to_string()))?;

        let explanation = response
            .text()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(ExplainError::EmptyResponse)?;

        Ok(ExplainResponse { explanation })
    }
}
