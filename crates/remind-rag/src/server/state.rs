//! Application state for the RAG server

use std::sync::Arc;

use crate::config::{BackendProvider, RagConfig, StorageBackend};
use crate::error::Result;
use crate::pipeline::RagPipeline;
use crate::providers::{
    EmbeddingProvider, GeminiClient, LlmProvider, OllamaClient, VectorStoreProvider,
};
use crate::retrieval::InMemoryVectorStore;
use crate::storage::SqliteVectorStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    pipeline: RagPipeline,
}

impl AppState {
    /// Construct providers and the index from configuration
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!(
            "Initializing RAG application state (backend: {:?}, storage: {:?})...",
            config.backend,
            config.storage.backend
        );

        let (embedding_provider, llm_provider): (Arc<dyn EmbeddingProvider>, Arc<dyn LlmProvider>) =
            match config.backend {
                BackendProvider::Gemini => {
                    let client = Arc::new(GeminiClient::new(&config.llm, &config.embeddings)?);
                    (client.clone() as Arc<dyn EmbeddingProvider>, client as Arc<dyn LlmProvider>)
                }
                BackendProvider::Ollama => {
                    let client = Arc::new(OllamaClient::new(&config.llm, &config.embeddings)?);
                    (client.clone() as Arc<dyn EmbeddingProvider>, client as Arc<dyn LlmProvider>)
                }
            };

        let store: Arc<dyn VectorStoreProvider> = match config.storage.backend {
            StorageBackend::Sqlite => {
                tracing::info!("Opening index at {}", config.storage.database_path.display());
                Arc::new(SqliteVectorStore::new(&config.storage.database_path)?)
            }
            StorageBackend::Memory => Arc::new(InMemoryVectorStore::new()),
        };

        tracing::info!(
            "Providers ready: embeddings={}, llm={} ({}), index={}",
            embedding_provider.name(),
            llm_provider.name(),
            llm_provider.model(),
            store.name()
        );

        let pipeline = RagPipeline::from_config(&config, embedding_provider, llm_provider, store);
        Ok(Self::from_pipeline(config, pipeline))
    }

    /// Wrap an already assembled pipeline
    pub fn from_pipeline(config: RagConfig, pipeline: RagPipeline) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn pipeline(&self) -> &RagPipeline {
        &self.inner.pipeline
    }

    /// Whether the index can serve requests
    pub async fn is_ready(&self) -> bool {
        match self.inner.pipeline.store().health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Index health check failed: {}", e);
                false
            }
        }
    }
}
