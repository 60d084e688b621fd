//! OpenAI-compatible chat-completions client

use crate::config::ServiceOptions;
use crate::error::{Error, Result};
use crate::service::{ClassifiedPayload, PayloadService};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

const SYSTEM_PROMPT: &str = "You turn a user's description of a QR code into the exact text the QR code \
should encode. Reply with a single JSON object and nothing else: \
{\"type\": \"WiFi\" | \"Contact\" | \"URL\" | \"Event\" | \"Text\", \"data\": \"<encodable string>\"}. \
Use WIFI:T:<WPA|WEP|nopass>;S:<ssid>;P:<password>;H:<true|false>;; for WiFi, a vCard 3.0 for contacts, \
an iCalendar VEVENT for events, a full https:// URL for links, and the literal text otherwise.";

/// Completion-backed [`PayloadService`]
#[derive(Debug, Clone)]
pub struct CompletionService {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl CompletionService {
    /// Build a client from service options
    pub fn new(options: &ServiceOptions) -> Result<Self> {
        if options.endpoint.trim().is_empty() {
            return Err(Error::Config(
                "Completion service endpoint is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs.max(1)))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: options.endpoint.clone(),
            model: options.model.clone(),
            api_key: options.api_key.clone(),
        })
    }
}

#[async_trait]
impl PayloadService for CompletionService {
    async fn classify(&self, prompt: &str) -> Result<ClassifiedPayload> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(Error::InvalidPrompt("prompt is empty".to_string()));
        }

        let body = json!({
            "model": self.model,
            "temperature": 0,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
        });

        debug!(endpoint = %self.endpoint, model = %self.model, "Requesting classification");

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::Service(format!(
                "HTTP {status}: {}",
                text.chars().take(200).collect::<String>()
            )));
        }

        let payload = parse_completion(&text)?;
        info!(kind = %payload.kind, bytes = payload.data.len(), "Prompt classified");
        Ok(payload)
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

/// Extract the classified payload from a chat-completions response body.
pub fn parse_completion(body: &str) -> Result<ClassifiedPayload> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| Error::Service(format!("Malformed completion response: {e}")))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| Error::Service("Completion response has no content".to_string()))?;

    let payload: ClassifiedPayload = serde_json::from_str(strip_code_fence(&content))
        .map_err(|e| Error::Service(format!("Completion content is not a payload object: {e}")))?;

    if payload.data.trim().is_empty() {
        return Err(Error::Service(
            "Completion returned an empty payload".to_string(),
        ));
    }

    Ok(payload)
}

// Models sometimes wrap the JSON object in a markdown code fence.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop the optional language tag on the opening fence line.
    match inner.split_once('\n') {
        Some((tag, rest)) if !tag.trim_start().starts_with('{') => rest.trim(),
        _ => inner.trim(),
    }
}
