// src/services/assistant.rs

//! Writing assistant: drafts posts from a topic and translates them.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::models::{AiConfig, PostDraft, Translation};

/// Abstraction over the generative text service.
///
/// Both operations either return a complete result or fail as a whole;
/// callers must not rely on any partially filled value.
#[async_trait]
pub trait PostAssistant: Send + Sync {
    /// Draft a post about `topic`.
    async fn generate_draft(&self, topic: &str) -> Result<PostDraft>;

    /// Translate a post's text into `language`.
    async fn translate(&self, text: &Translation, language: &str) -> Result<Translation>;
}

/// Assistant backed by the Gemini `generateContent` endpoint.
pub struct GeminiAssistant {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiAssistant {
    /// Creates a new Gemini assistant.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - API base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`
    /// * `model` - Model id, e.g. `gemini-2.5-flash`
    /// * `api_key` - API key sent in the `x-goog-api-key` header
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Build from config, reading the key from the configured variable.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        Ok(Self::new(
            config.endpoint.clone(),
            config.model.clone(),
            config.api_key()?,
        ))
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// One structured round trip; any failure is reported as a plain message.
    async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: String,
        schema: Value,
    ) -> std::result::Result<T, String> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            },
        });

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("API error {status}: {error_text}"));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| format!("unreadable response: {e}"))?;

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| "missing text in response".to_string())?;

        serde_json::from_str(text).map_err(|e| format!("response does not match schema: {e}"))
    }
}

#[async_trait]
impl PostAssistant for GeminiAssistant {
    async fn generate_draft(&self, topic: &str) -> Result<PostDraft> {
        let prompt = format!(
            "Write an engaging blog post about: {topic}. \
             Return a title, a one-sentence excerpt, a short description and \
             the full article body in Markdown."
        );
        let draft: PostDraft = self
            .generate_json(prompt, draft_schema())
            .await
            .map_err(AppError::generation)?;

        if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
            return Err(AppError::generation("draft is missing title or content"));
        }
        log::info!("Generated draft '{}'", draft.title);
        Ok(draft)
    }

    async fn translate(&self, text: &Translation, language: &str) -> Result<Translation> {
        let source = serde_json::to_string(text)?;
        let prompt = format!(
            "Translate the following blog post into {}. Keep the Markdown \
             formatting intact and return the same fields.\n\n{source}",
            language_name(language)
        );
        let translated: Translation = self
            .generate_json(prompt, translation_schema())
            .await
            .map_err(|message| AppError::translation(language, message))?;

        if translated.title.trim().is_empty() {
            return Err(AppError::translation(language, "translation has no title"));
        }
        Ok(translated)
    }
}

fn draft_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "excerpt": { "type": "STRING" },
            "description": { "type": "STRING" },
            "content": { "type": "STRING" },
        },
        "required": ["title", "excerpt", "content"],
    })
}

fn translation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "excerpt": { "type": "STRING" },
            "content": { "type": "STRING" },
        },
        "required": ["title", "excerpt", "content"],
    })
}

/// English name of a language code, for prompts.
pub fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "fr" => "French",
        "es" => "Spanish",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "nl" => "Dutch",
        "ja" => "Japanese",
        "zh" => "Chinese",
        "ko" => "Korean",
        "ar" => "Arabic",
        other => other,
    }
}
