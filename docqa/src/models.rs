use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind of content an uploaded file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    PlainText,
}

impl MediaType {
    fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::PlainText => "text/plain",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Text extracted from one uploaded file, keyed by its filename.
#[derive(Debug, Clone)]
pub struct Document {
    pub revision: Uuid,
    pub filename: String,
    pub media_type: MediaType,
    pub content: String,
}

impl Document {
    pub fn new(filename: impl Into<String>, media_type: MediaType, content: String) -> Self {
        Self {
            revision: Uuid::new_v4(),
            filename: filename.into(),
            media_type,
            content,
        }
    }

    /// Size of the stored text in characters, not bytes.
    pub fn characters(&self) -> usize {
        self.content.chars().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a chat-completion conversation. Also used for caller-supplied history turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

pub type ConversationTurn = ChatMessage;

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub filename: String,
    pub media_type: MediaType,
    pub characters_extracted: usize,
    pub revision: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionMessage,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatCompletionMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}
