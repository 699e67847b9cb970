use crate::config::Settings;
use crate::error::CompletionError;
use crate::models::*;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Anything that can turn a message list into an answer.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, CompletionError>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint (OpenRouter by default).
pub struct CompletionService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    site_url: String,
    app_name: String,
}

impl CompletionService {
    pub fn new(settings: &Settings) -> Result<Self, CompletionError> {
        Self::with_timeout(settings, settings.completion_timeout)
    }

    pub fn with_timeout(settings: &Settings, timeout: Duration) -> Result<Self, CompletionError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            site_url: settings.site_url.clone(),
            app_name: settings.app_name.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for CompletionService {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
        };

        log::debug!(
            "Sending {} messages to {} (model {})",
            request.messages.len(),
            self.endpoint(),
            self.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.app_name)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            log::error!("Completion API returned {}: {}", status, body);
            return Err(CompletionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let completion: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                CompletionError::MalformedResponse("response has no message content".to_string())
            })
    }
}
