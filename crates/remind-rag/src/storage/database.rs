//! SQLite database for persistent documents, chunks and embeddings
//!
//! Embeddings are stored as JSON arrays next to their chunk. Search is an
//! exact scan: every vector is loaded and scored with cosine similarity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::providers::vector_store::{VectorSearchResult, VectorStoreProvider};
use crate::retrieval::search::{cosine_similarity, select_top_k};
use crate::types::{Chunk, Document, DocumentSummary, NewChunk};

/// SQLite-based retrieval index
#[derive(Clone)]
pub struct SqliteVectorStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteVectorStore {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::store(format!("Failed to open database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Create an in-memory database
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::store(format!("Failed to open in-memory database: {}", e)))?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.migrate()?;
        Ok(db)
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA foreign_keys=ON;
        "#,
        )
        .map_err(|e| Error::store(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                content TEXT NOT NULL,
                uploaded_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_documents_uploaded_at ON documents(uploaded_at);

            CREATE TABLE IF NOT EXISTS chunks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                document_id TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                content TEXT NOT NULL,
                embedding TEXT NOT NULL,
                FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE,
                UNIQUE(document_id, chunk_index)
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_document_id ON chunks(document_id);
        "#,
        )
        .map_err(|e| Error::store(format!("Failed to run migrations: {}", e)))?;

        Ok(())
    }

    /// Insert a document and its chunks in one transaction
    pub fn insert_document_sync(
        &self,
        document: &Document,
        chunks: &[NewChunk],
    ) -> Result<Vec<i64>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO documents (id, filename, content, uploaded_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                document.id.to_string(),
                document.filename,
                document.content,
                document.uploaded_at,
            ],
        )?;

        let mut ids = Vec::with_capacity(chunks.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO chunks (document_id, chunk_index, content, embedding) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for chunk in chunks {
                let embedding = serde_json::to_string(&chunk.embedding)
                    .map_err(|e| Error::store(format!("Failed to encode embedding: {}", e)))?;
                stmt.execute(params![
                    document.id.to_string(),
                    chunk.chunk_index,
                    chunk.content,
                    embedding,
                ])?;
                ids.push(tx.last_insert_rowid());
            }
        }

        tx.commit()?;
        Ok(ids)
    }

    /// Score every stored chunk against the query and keep the best `top_k`
    pub fn top_k_sync(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorSearchResult>> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT c.id, c.document_id, c.chunk_index, c.content, c.embedding, d.filename
            FROM chunks c
            JOIN documents d ON d.id = c.document_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut scored = Vec::new();
        for row in rows {
            let (id, document_id, chunk_index, content, embedding, filename) = row?;
            let embedding: Vec<f32> = serde_json::from_str(&embedding)
                .map_err(|e| Error::store(format!("Corrupt embedding for chunk {}: {}", id, e)))?;
            if embedding.len() != query_embedding.len() {
                return Err(Error::store(format!(
                    "Query has {} dimensions but chunk {} has {}",
                    query_embedding.len(),
                    id,
                    embedding.len()
                )));
            }

            let similarity = cosine_similarity(query_embedding, &embedding);
            let chunk = Chunk {
                id,
                document_id: parse_uuid(&document_id)?,
                chunk_index,
                content,
            };
            scored.push(((chunk, filename), id, similarity));
        }

        Ok(select_top_k(scored, top_k)
            .into_iter()
            .map(|((chunk, filename), similarity)| VectorSearchResult {
                chunk,
                filename,
                similarity,
            })
            .collect())
    }

    /// All documents with chunk counts, newest first
    pub fn list_documents_sync(&self) -> Result<Vec<DocumentSummary>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT d.id, d.filename, d.uploaded_at, COUNT(c.id)
            FROM documents d
            LEFT JOIN chunks c ON c.document_id = d.id
            GROUP BY d.id
            ORDER BY d.uploaded_at DESC, d.rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, DateTime<Utc>>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            let (id, filename, uploaded_at, chunk_count) = row?;
            summaries.push(DocumentSummary {
                id: parse_uuid(&id)?,
                filename,
                uploaded_at,
                chunk_count: chunk_count as usize,
            });
        }
        Ok(summaries)
    }

    /// Get a document by ID
    pub fn get_document_sync(&self, id: &Uuid) -> Result<Option<Document>> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT filename, content, uploaded_at FROM documents WHERE id = ?1",
                params![id.to_string()],
                |row| {
                    Ok(Document {
                        id: *id,
                        filename: row.get(0)?,
                        content: row.get(1)?,
                        uploaded_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Delete a document; chunks go with it
    pub fn delete_document_sync(&self, id: &Uuid) -> Result<bool> {
        let conn = self.conn.lock();
        let deleted = conn.execute("DELETE FROM documents WHERE id = ?1", params![id.to_string()])?;
        Ok(deleted > 0)
    }

    /// Total number of chunks
    pub fn chunk_count_sync(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Run a sync operation on the blocking pool
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SqliteVectorStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }
}

fn parse_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| Error::store(format!("Corrupt document id '{}': {}", raw, e)))
}

#[async_trait]
impl VectorStoreProvider for SqliteVectorStore {
    async fn insert_document(
        &self,
        document: &Document,
        chunks: Vec<NewChunk>,
    ) -> Result<Vec<i64>> {
        let document = document.clone();
        self.blocking(move |store| store.insert_document_sync(&document, &chunks))
            .await
    }

    async fn top_k(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<VectorSearchResult>> {
        let query = query_embedding.to_vec();
        self.blocking(move |store| store.top_k_sync(&query, top_k)).await
    }

    async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        self.blocking(|store| store.list_documents_sync()).await
    }

    async fn get_document(&self, id: &Uuid) -> Result<Option<Document>> {
        let id = *id;
        self.blocking(move |store| store.get_document_sync(&id)).await
    }

    async fn delete_document(&self, id: &Uuid) -> Result<bool> {
        let id = *id;
        self.blocking(move |store| store.delete_document_sync(&id)).await
    }

    async fn len(&self) -> Result<usize> {
        self.blocking(|store| store.chunk_count_sync()).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.blocking(|store| {
            let conn = store.conn.lock();
            Ok(conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))? == 1)
        })
        .await
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
