//! HTTP reasoning backend.
//!
//! Posts the assembled analysis prompt to a reasoning service and parses
//! the structured JSON reply. The wire contract is prompt in, suggestion
//! JSON out; the service itself is interchangeable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::ai::provider::{SuggestionProvider, Synthesis, SynthesisRequest};
use crate::ai::{prompts, AdvisorError};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for an HTTP reasoning service.
pub struct RemoteAdvisor {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct AdvisorRequest<'a> {
    system: &'a str,
    prompt: &'a str,
}

impl RemoteAdvisor {
    /// `endpoint` is the full URL of the service's synthesis route.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        RemoteAdvisor {
            client,
            endpoint: endpoint.into(),
            api_key: None,
        }
    }

    /// Send a bearer token with every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Replace the default request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    async fn send(&self, prompt: &str) -> Result<String, AdvisorError> {
        let body = AdvisorRequest {
            system: prompts::SYSTEM_PROMPT,
            prompt,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AdvisorError::ApiError { status, message });
        }

        Ok(response.text().await?)
    }
}

/// Parse a provider reply: a bare JSON object or one embedded in prose.
fn parse_synthesis(text: &str) -> Result<Synthesis, AdvisorError> {
    let json = extract_json_object(text)
        .ok_or_else(|| AdvisorError::ParseError("no JSON object in response".to_string()))?;
    let mut synthesis: Synthesis =
        serde_json::from_str(json).map_err(|e| AdvisorError::ParseError(e.to_string()))?;
    synthesis.risk_score = synthesis.risk_score.clamp(0.0, 1.0);
    Ok(synthesis)
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[async_trait]
impl SuggestionProvider for RemoteAdvisor {
    fn name(&self) -> &str {
        "remote"
    }

    async fn is_available(&self) -> bool {
        !self.endpoint.is_empty()
    }

    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Synthesis, AdvisorError> {
        if self.endpoint.is_empty() {
            return Err(AdvisorError::Unavailable);
        }

        let prompt = prompts::build_analysis_prompt(request);
        tracing::debug!("Sending synthesis request to {}", self.endpoint);
        let reply = self.send(&prompt).await?;
        parse_synthesis(&reply)
    }
}
