use crate::models::ChatMessage;

pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 20_000;

/// Reply the model is told to give when the document does not contain the answer.
pub const NOT_FOUND_ANSWER: &str = "I couldn't find that in the document.";

/// Builds the chat message list sent for every question.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    max_document_chars: usize,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DOCUMENT_CHARS)
    }
}

impl PromptAssembler {
    pub fn new(max_document_chars: usize) -> Self {
        Self { max_document_chars }
    }

    pub fn max_document_chars(&self) -> usize {
        self.max_document_chars
    }

    /// System instructions with the (truncated) document, then `history` as given, then the
    /// question as the final user message.
    pub fn assemble(
        &self,
        document: &str,
        question: &str,
        history: &[ChatMessage],
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(self.build_system_prompt(document)));
        messages.extend(history.iter().cloned());
        messages.push(ChatMessage::user(question));
        messages
    }

    fn build_system_prompt(&self, document: &str) -> String {
        let content = truncate_chars(document, self.max_document_chars);
        format!(
            r#"You are a helpful assistant that answers questions about a document provided by the user.

INSTRUCTIONS:
1. Answer the question using the document content below
2. If the answer is not in the document, reply exactly: "{NOT_FOUND_ANSWER}"

DOCUMENT CONTENT:
{content}"#
        )
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
