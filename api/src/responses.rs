use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub documents: usize,
}

#[derive(Deserialize, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub characters_extracted: usize,
    pub message: String,
}

#[derive(Deserialize, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Deserialize, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}
