use crate::completion_service::{CompletionClient, CompletionService};
use crate::config::Settings;
use crate::document_processor::DocumentProcessor;
use crate::document_store::DocumentStore;
use crate::error::QaError;
use crate::models::*;
use crate::prompt::PromptAssembler;
use std::sync::Arc;

/// Upload and ask orchestration over the store, the prompt assembler and a completion client.
pub struct QaService {
    store: DocumentStore,
    processor: DocumentProcessor,
    assembler: PromptAssembler,
    completion: Arc<dyn CompletionClient>,
}

impl QaService {
    pub fn new(assembler: PromptAssembler, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            store: DocumentStore::new(),
            processor: DocumentProcessor::new(),
            assembler,
            completion,
        }
    }

    /// Wire the service against the configured completion provider.
    pub fn from_settings(settings: &Settings) -> Result<Self, QaError> {
        let completion = CompletionService::new(settings)?;
        Ok(Self::new(
            PromptAssembler::new(settings.max_document_chars),
            Arc::new(completion),
        ))
    }

    pub async fn upload(
        &self,
        filename: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<UploadOutcome, QaError> {
        let media_type = DocumentProcessor::detect_media_type(content_type, filename)?;
        log::info!("Processing upload {} ({}, {} bytes)", filename, media_type, bytes.len());

        let content = self.processor.extract_blocking(bytes, media_type).await?;
        let document = Document::new(filename, media_type, content);

        let outcome = UploadOutcome {
            filename: document.filename.clone(),
            media_type,
            characters_extracted: document.characters(),
            revision: document.revision,
        };

        if let Some(previous) = self.store.put(document).await {
            log::info!(
                "Replaced {} revision {} with {}",
                filename,
                previous.revision,
                outcome.revision
            );
        }
        log::info!(
            "Stored {} with {} characters",
            outcome.filename,
            outcome.characters_extracted
        );

        Ok(outcome)
    }

    pub async fn ask(
        &self,
        filename: &str,
        question: &str,
        history: &[ConversationTurn],
    ) -> Result<String, QaError> {
        let start_time = std::time::Instant::now();
        let document = self.store.get(filename).await?;

        let characters = document.characters();
        if characters > self.assembler.max_document_chars() {
            log::info!(
                "Truncating {} from {} to {} characters for the prompt",
                filename,
                characters,
                self.assembler.max_document_chars()
            );
        }

        let messages = self.assembler.assemble(&document.content, question, history);
        let answer = self.completion.complete(messages).await?;

        log::info!(
            "Answered question about {} ({} history turns) in {} ms",
            filename,
            history.len(),
            start_time.elapsed().as_millis()
        );
        Ok(answer)
    }

    pub async fn document_count(&self) -> usize {
        self.store.count().await
    }
}
