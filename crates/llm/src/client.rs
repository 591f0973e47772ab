use async_trait::async_trait;
use reqwest::Client;
use studycards_common::{AppConfig, Result, StudyCardsError};
use tracing::{debug, info, warn};

use crate::llm_trait::GenerationBackend;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, GenerateOptions};

/// Chat completions API client
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    api_url: String,
    api_key: Option<String>,
    model: String,
    options: GenerateOptions,
    client: Client,
}

impl ChatCompletionsClient {
    /// Create new client
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        options: GenerateOptions,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self::with_http_client(client, api_url, api_key, model, options))
    }

    /// Create client around an existing HTTP client
    pub fn with_http_client(
        client: Client,
        api_url: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        options: GenerateOptions,
    ) -> Self {
        let api_url = api_url.into();
        let api_key = api_key.filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            warn!("No API key configured; generation requests will be rejected");
        }

        info!("Chat completions client initialized: {}", api_url);
        Self {
            api_url,
            api_key,
            model: model.into(),
            options,
            client,
        }
    }

    /// Create client from application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.model.clone(),
            GenerateOptions {
                temperature: config.temperature,
                max_tokens: config.max_output_tokens,
            },
            std::time::Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Build the request body for a prompt
    pub fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
        }
    }

    /// Single request/response exchange. No retry.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        // Checked before touching the network
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            StudyCardsError::config(
                "API key not configured. Set STUDYCARDS_API_KEY or DEEPSEEK_API_KEY.",
            )
        })?;

        let request = self.build_request(prompt);

        debug!(
            "Sending generation request - Model: {}, Prompt length: {}",
            request.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| StudyCardsError::network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StudyCardsError::network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            warn!("Generation API error response ({}): {}", status, body);
            return Err(StudyCardsError::service(status.as_u16(), body));
        }

        let parsed: ChatCompletionResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Failed to parse completion envelope: {}", e);
                return Err(StudyCardsError::malformed(body));
            }
        };

        if parsed.truncated() {
            warn!(
                "Completion stopped at max_tokens ({}), output is likely cut off",
                self.options.max_tokens
            );
        }

        let content = match parsed.first_content() {
            Some(content) => content.to_string(),
            None => {
                warn!("Completion response carried no content");
                return Err(StudyCardsError::malformed(body));
            }
        };

        debug!(
            "Received completion - Model: {}, Length: {}",
            parsed.model.as_deref().unwrap_or(&self.model),
            content.len()
        );
        Ok(content)
    }
}

#[async_trait]
impl GenerationBackend for ChatCompletionsClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.generate(prompt).await
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
