//! Ollama client for local embeddings and generation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;
use super::{http_client, retry_request, RequestError};

/// Ollama API client with automatic retry
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    embed_model: String,
    generate_model: String,
    dimensions: usize,
    temperature: f32,
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(llm: &LlmConfig, embeddings: &EmbeddingConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(llm.timeout_secs)?,
            base_url: llm.base_url.trim_end_matches('/').to_string(),
            embed_model: embeddings.model.clone(),
            generate_model: llm.generate_model.clone(),
            dimensions: embeddings.dimensions,
            temperature: llm.temperature,
            max_retries: llm.max_retries,
        })
    }

    async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
        what: &str,
    ) -> std::result::Result<R, RequestError>
    where
        B: Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                RequestError::Retryable(Error::provider(format!(
                    "Ollama {} request failed: {}",
                    what, e
                )))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RequestError::from_status(
                status,
                format!("Ollama {} failed: HTTP {} - {}", what, status, body),
            ));
        }

        response.json().await.map_err(|e| {
            RequestError::Permanent(Error::provider(format!(
                "Failed to parse Ollama {} response: {}",
                what, e
            )))
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: &self.embed_model,
            prompt: text,
        };

        let response: EmbedResponse = retry_request(self.max_retries, || {
            self.post_json("/api/embeddings", &request, "embedding")
        })
        .await?;

        Ok(response.embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

#[async_trait]
impl LlmProvider for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<Option<String>> {
        let request = GenerateRequest {
            model: &self.generate_model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        tracing::info!("Generating answer with model: {}", self.generate_model);

        let response: GenerateResponse = retry_request(self.max_retries, || {
            self.post_json("/api/generate", &request, "generation")
        })
        .await?;

        Ok(response.response.filter(|text| !text.is_empty()))
    }

    async fn health_check(&self) -> Result<bool> {
        EmbeddingProvider::health_check(self).await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.generate_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Serve every request with the same status and count the hits
    async fn fixed_status_server(
        status: &'static str,
        body: &'static str,
    ) -> (String, Arc<AtomicU32>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicU32::new(0));

        let counter = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                read_request(&mut stream).await;
                counter.fetch_add(1, Ordering::SeqCst);
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    async fn read_request(stream: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    return;
                }
            }
        }
    }

    fn client_for(base_url: String, max_retries: u32) -> OllamaClient {
        let llm = LlmConfig {
            base_url,
            max_retries,
            timeout_secs: 5,
            ..LlmConfig::ollama()
        };
        OllamaClient::new(&llm, &EmbeddingConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_client_error_sent_once() {
        let (url, hits) =
            fixed_status_server("400 Bad Request", r#"{"error":"model not found"}"#).await;
        let client = client_for(url, 2);

        let err = client.embed("hello").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert!(err.to_string().contains("400"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_body_sent_once() {
        let (url, hits) = fixed_status_server("200 OK", r#"{"unexpected":true}"#).await;
        let client = client_for(url, 2);

        let err = client.embed("hello").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_error_retried() {
        let (url, hits) = fixed_status_server("503 Service Unavailable", "{}").await;
        let client = client_for(url, 1);

        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_generate_request_is_not_streamed() {
        let request = GenerateRequest {
            model: "llama3.2:3b",
            prompt: "hi",
            stream: false,
            options: GenerateOptions { temperature: 0.3 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["model"], "llama3.2:3b");
    }

    #[test]
    fn test_missing_response_text() {
        let response: GenerateResponse = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert!(response.response.is_none());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let llm = LlmConfig {
            base_url: "http://localhost:11434/".to_string(),
            ..LlmConfig::ollama()
        };
        let client = OllamaClient::new(&llm, &EmbeddingConfig::default()).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(LlmProvider::name(&client), "ollama");
    }
}
