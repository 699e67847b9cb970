use crate::ask_request::AskRequest;
use crate::error::ApiError;
use crate::responses::{AskResponse, HealthResponse, UploadResponse};
use axum::{
    extract::{Multipart, State},
    Json,
};
use doc_qa::QaService;
use std::sync::Arc;

const FILE_FIELD: &str = "file";

pub async fn health(State(service): State<Arc<QaService>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Backend is running".to_string(),
        documents: service.document_count().await,
    })
}

/// Extract text from the multipart `file` field and store it under the uploaded filename.
pub async fn upload(
    State(service): State<Arc<QaService>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        log::warn!("Failed to read multipart: {}", e);
        ApiError::new(e.status(), format!("Failed to read multipart: {}", e.body_text()))
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("unknown").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| {
            log::warn!("Failed to read file bytes: {}", e);
            ApiError::new(e.status(), format!("Failed to read file: {}", e.body_text()))
        })?;

        let outcome = service
            .upload(&filename, content_type.as_deref(), data.to_vec())
            .await?;

        return Ok(Json(UploadResponse {
            filename: outcome.filename,
            characters_extracted: outcome.characters_extracted,
            message: "File uploaded and processed successfully".to_string(),
        }));
    }

    Err(ApiError::bad_request("No file uploaded"))
}

pub async fn ask(
    State(service): State<Arc<QaService>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let answer = service
        .ask(&request.filename, &request.question, &request.history)
        .await?;
    Ok(Json(AskResponse { answer }))
}
