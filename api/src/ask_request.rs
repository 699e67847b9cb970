use doc_qa::ConversationTurn;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub filename: String,
    pub question: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}
