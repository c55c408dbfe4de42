//! Model Gateway
//!
//! Sends the rendered conversation transcript to a hosted generative-language
//! model and returns one text completion. Blocking, one request per turn,
//! no retries and no streaming.
//!
//! Also provides a scripted fake for tests.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Hosted model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_model")]
    pub name: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Usually supplied through GEMINI_API_KEY instead of the file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            endpoint: default_endpoint(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Anything that can turn a transcript into a reply
pub trait ModelGateway {
    fn generate(&self, transcript: &str) -> Result<String, GatewayError>;
}

/// Gemini `generateContent` client
pub struct GeminiGateway {
    config: GatewayConfig,
    client: reqwest::blocking::Client,
}

impl GeminiGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.name
    }

    /// Request URL. The key travels in a header so it never shows up in
    /// error messages that echo the URL.
    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.name
        )
    }
}

impl ModelGateway for GeminiGateway {
    fn generate(&self, transcript: &str) -> Result<String, GatewayError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GatewayError::MissingApiKey)?;

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: transcript.to_string(),
                }],
            }],
        };

        debug!(
            "Calling model {} ({} transcript bytes)",
            self.config.name,
            transcript.len()
        );

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout(self.config.timeout_secs)
                } else {
                    GatewayError::Http(format!("Request failed: {}", e.without_url()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            let err = GatewayError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            };
            warn!("Model call failed: {}", err);
            return Err(err);
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| {
                GatewayError::InvalidResponse(format!("Failed to parse response: {}", e.without_url()))
            })?;

        extract_text(parsed)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GatewayError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or(GatewayError::EmptyResponse)
}

/// Pull `STATUS: message` out of a provider error body, falling back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status = wrapper.error.status.unwrap_or_default();
            let message = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status.is_empty() {
                message
            } else {
                format!("{}: {}", status, message)
            }
        })
        .unwrap_or_else(|_| body.to_string())
}

/// Fake gateway for testing
pub struct FakeGateway {
    responses: std::sync::Mutex<Vec<Result<String, GatewayError>>>,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl FakeGateway {
    /// Replies are consumed in order; the last one repeats
    pub fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn always_reply(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    pub fn always_error(error: GatewayError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Number of generate() calls made
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Transcripts received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl ModelGateway for FakeGateway {
    fn generate(&self, transcript: &str) -> Result<String, GatewayError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(transcript.to_string());
        }

        let mut responses = match self.responses.lock() {
            Ok(guard) => guard,
            Err(_) => return Err(GatewayError::EmptyResponse),
        };

        match responses.len() {
            0 => Err(GatewayError::EmptyResponse),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}
