//! Query endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResult};

/// POST /api/query - Answer a question from the uploaded documents
pub async fn query_documents(
    State(state): State<AppState>,
    request: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResult>> {
    let Json(request) = request.map_err(|e| {
        tracing::debug!("Rejected query body: {}", e);
        Error::validation("Question is required")
    })?;

    tracing::info!("Query: \"{}\"", request.question);

    Ok(Json(state.pipeline().query(&request.question).await?))
}
