//! Gemini client for embeddings and answer generation
//!
//! Talks to the Generative Language REST API with an API key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;
use super::{http_client, retry_request, RequestError};

/// Gemini API client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    embed_model: String,
    generate_model: String,
    dimensions: usize,
    temperature: f32,
    max_retries: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: String,
    content: Content<'a>,
    output_dimensionality: usize,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if it has any
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(llm: &LlmConfig, embeddings: &EmbeddingConfig) -> Result<Self> {
        let api_key = llm
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::config("GEMINI_API_KEY is not set"))?;

        Ok(Self {
            client: http_client(llm.timeout_secs)?,
            base_url: llm.base_url.trim_end_matches('/').to_string(),
            api_key,
            embed_model: embeddings.model.clone(),
            generate_model: llm.generate_model.clone(),
            dimensions: embeddings.dimensions,
            temperature: llm.temperature,
            max_retries: llm.max_retries,
        })
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    async fn post_json<B, R>(
        &self,
        url: &str,
        body: &B,
        what: &str,
    ) -> std::result::Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                RequestError::Retryable(Error::provider(format!(
                    "Gemini {} request failed: {}",
                    what, e
                )))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::from_status(
                status,
                format!("Gemini {} failed ({}): {}", what, status, body),
            ));
        }

        response.json().await.map_err(|e| {
            RequestError::Permanent(Error::provider(format!(
                "Failed to parse Gemini {} response: {}",
                what, e
            )))
        })
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = self.model_url(&self.embed_model, "embedContent");
        let request = EmbedRequest {
            model: format!("models/{}", self.embed_model),
            content: Content {
                parts: vec![Part { text }],
            },
            output_dimensionality: self.dimensions,
        };

        let response: EmbedResponse = retry_request(self.max_retries, || {
            self.post_json(&url, &request, "embedding")
        })
        .await?;

        Ok(response.embedding.values)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models/{}", self.base_url, self.embed_model);
        match self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[async_trait]
impl LlmProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let url = self.model_url(&self.generate_model, "generateContent");
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        tracing::info!("Generating answer with model: {}", self.generate_model);

        let response: GenerateResponse = retry_request(self.max_retries, || {
            self.post_json(&url, &request, "generation")
        })
        .await?;

        Ok(response.into_text())
    }

    async fn health_check(&self) -> Result<bool> {
        EmbeddingProvider::health_check(self).await
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.generate_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_request_shape() {
        let request = EmbedRequest {
            model: "models/gemini-embedding-001".to_string(),
            content: Content {
                parts: vec![Part { text: "hello" }],
            },
            output_dimensionality: 768,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "models/gemini-embedding-001");
        assert_eq!(json["content"]["parts"][0]["text"], "hello");
        assert_eq!(json["outputDimensionality"], 768);
    }

    #[test]
    fn test_generate_response_text() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"React is "},{"text":"a library."}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("React is a library."));
    }

    #[test]
    fn test_generate_response_without_text() {
        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(empty.into_text().is_none());

        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(blocked.into_text().is_none());

        let missing: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(missing.into_text().is_none());
    }

    #[test]
    fn test_requires_api_key() {
        let result = GeminiClient::new(&LlmConfig::default(), &EmbeddingConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));

        let llm = LlmConfig {
            api_key: Some("key".to_string()),
            ..LlmConfig::default()
        };
        let client = GeminiClient::new(&llm, &EmbeddingConfig::default()).unwrap();
        assert_eq!(
            client.model_url("gemini-embedding-001", "embedContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/\
             gemini-embedding-001:embedContent"
        );
    }
}
