//! API routes for the RAG server

pub mod documents;
pub mod query;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Document management, with a larger body limit for uploads
        .route(
            "/documents",
            post(documents::upload_document)
                .layer(DefaultBodyLimit::max(max_upload_size))
                .get(documents::list_documents),
        )
        .route("/documents/:id", delete(documents::delete_document))
        // Query
        .route("/query", post(query::query_documents))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "remind-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Question answering over uploaded text documents",
        "endpoints": {
            "POST /api/documents": "Upload a .txt file (multipart field 'file')",
            "GET /api/documents": "List documents with chunk counts",
            "DELETE /api/documents/:id": "Delete a document and its chunks",
            "POST /api/query": "Ask a question"
        }
    }))
}
