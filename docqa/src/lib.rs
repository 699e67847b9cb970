pub mod completion_service;
pub mod config;
pub mod document_processor;
pub mod document_store;
pub mod error;
pub mod models;
pub mod prompt;
pub mod qa_service;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use completion_service::{CompletionClient, CompletionService};
pub use config::Settings;
pub use document_processor::DocumentProcessor;
pub use document_store::DocumentStore;
pub use error::*;
pub use models::*;
pub use prompt::PromptAssembler;
pub use qa_service::QaService;
