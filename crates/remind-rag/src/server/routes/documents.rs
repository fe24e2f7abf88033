//! Document upload, listing and deletion endpoints

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::PathRejection,
        Multipart, Path, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingestion::decode_text_upload;
use crate::server::state::AppState;
use crate::types::{DeleteResponse, DocumentSummary, IngestResult};

/// POST /api/documents - Upload one plain-text file (multipart field `file`)
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<IngestResult>)> {
    let mut multipart =
        multipart.map_err(|e| Error::validation(format!("Expected a multipart upload: {}", e)))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.txt".to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::validation(format!("Failed to read file: {}", e)))?;

        tracing::info!("Processing file: {} ({} bytes)", filename, data.len());

        let text = decode_text_upload(&filename, content_type.as_deref(), data.to_vec())?;
        let result = state.pipeline().ingest(&text, &filename).await?;

        return Ok((StatusCode::CREATED, Json(result)));
    }

    Err(Error::validation("No file uploaded"))
}

/// GET /api/documents - List all documents, newest first
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<DocumentSummary>>> {
    Ok(Json(state.pipeline().list_documents().await?))
}

/// DELETE /api/documents/:id - Delete a document and its chunks
pub async fn delete_document(
    State(state): State<AppState>,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeleteResponse>> {
    // An id that is not a UUID cannot name a stored document
    let Path(id) = id.map_err(|_| Error::NotFound("invalid document id".to_string()))?;

    if !state.pipeline().delete_document(&id).await? {
        return Err(Error::NotFound(id.to_string()));
    }

    Ok(Json(DeleteResponse { deleted: true }))
}
