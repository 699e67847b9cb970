use thiserror::Error;

/// Errors produced while turning uploaded bytes into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Neither the content type nor the filename extension names a supported format.
    #[error("Unsupported file type: {0}. Only PDF and plain text files are supported")]
    UnsupportedMediaType(String),
    /// The PDF parser rejected the file.
    #[error("Failed to parse PDF: {0}")]
    InvalidPdf(String),
    /// Plain text upload was not valid UTF-8.
    #[error("File is not valid UTF-8 text: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),
    #[error("No extractable content found in file")]
    NoExtractableContent,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found")]
    NotFound(String),
}

/// Errors raised while talking to the chat-completion provider.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Request never produced a response (connect failure, timeout, ...).
    #[error("Completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Provider answered with a non-success status.
    #[error("Upstream API error: {body}")]
    Upstream { status: u16, body: String },
    /// Provider answered 2xx but the body did not have the expected shape.
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
}

/// Umbrella error for upload and ask operations.
#[derive(Debug, Error)]
pub enum QaError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Completion(#[from] CompletionError),
    /// Background extraction task could not be joined.
    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Errors encountered while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    #[error("Invalid value for environment variable {key}: {value}")]
    InvalidValue { key: String, value: String },
}
