//! Gemini `generateContent` adapter.
//!
//! One non-streaming POST per turn. Uses browser `fetch()` via gloo-net for
//! WASM compatibility. The same endpoint serves audio transcription.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::Deserialize;
use serde_json::{json, Value};

use clarity_core::ports::*;
use clarity_types::{config::ModelConfig, message::Attachment, ClarityError, Result};

const TRANSCRIBE_INSTRUCTION: &str = "Transcribe the following audio exactly as spoken. Return only the transcribed text, no other commentary or formatting.";

pub struct GeminiProvider {
    config: ModelConfig,
}

impl GeminiProvider {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    /// `generateContent` URL for `model`, or the configured model when empty.
    pub fn endpoint(&self, model: &str) -> String {
        let model = if model.trim().is_empty() {
            &self.config.model
        } else {
            model.trim()
        };
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url().trim_end_matches('/'),
            model
        )
    }

    async fn post(&self, model: &str, body: &Value) -> Result<String> {
        if self.config.api_key.trim().is_empty() {
            return Err(ClarityError::Config("API key not found".to_string()));
        }

        let response = Request::post(&self.endpoint(model))
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .map_err(|e| ClarityError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ClarityError::Network(e.to_string()))?;

        if !response.ok() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ClarityError::Llm(format!("HTTP {}: {}", status, text)));
        }

        let data: ApiResponse = response
            .json()
            .await
            .map_err(|e| ClarityError::Llm(e.to_string()))?;

        extract_text(data)
    }
}

#[async_trait(?Send)]
impl GenerativeModelPort for GeminiProvider {
    async fn generate(&self, req: GenerateRequest) -> Result<String> {
        let body = build_request_body(&req);
        log::debug!(
            "generateContent on {}: {} history turns, {} parts",
            req.model,
            req.history.len(),
            req.parts.len()
        );
        self.post(&req.model, &body).await
    }
}

#[async_trait(?Send)]
impl TranscriptionPort for GeminiProvider {
    async fn transcribe(&self, audio: &Attachment) -> Result<String> {
        self.post(&self.config.model, &build_transcription_body(audio)).await
    }
}

// ─── Wire format ─────────────────────────────────────────────

fn part_to_json(part: &Part) -> Value {
    match part {
        Part::Text(text) => json!({ "text": text }),
        Part::InlineData(att) => json!({
            "inlineData": { "mimeType": att.mime_type, "data": att.data }
        }),
    }
}

fn turn_to_json(role: TurnRole, parts: &[Part]) -> Value {
    json!({
        "role": role.as_str(),
        "parts": parts.iter().map(part_to_json).collect::<Vec<_>>(),
    })
}

/// `generateContent` body: history turns followed by the current user turn.
pub fn build_request_body(req: &GenerateRequest) -> Value {
    let mut contents: Vec<Value> = req
        .history
        .iter()
        .map(|t| turn_to_json(t.role, &t.parts))
        .collect();
    contents.push(turn_to_json(TurnRole::User, &req.parts));

    let mut body = json!({ "contents": contents });

    if let Some(instruction) = &req.system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
    }
    if req.enable_search {
        body["tools"] = json!([{ "googleSearch": {} }]);
    }
    body
}

/// Audio first, then the fixed instruction; no tools.
pub fn build_transcription_body(audio: &Attachment) -> Value {
    json!({
        "contents": [turn_to_json(
            TurnRole::User,
            &[
                Part::InlineData(audio.clone()),
                Part::Text(TRANSCRIBE_INSTRUCTION.to_string()),
            ],
        )]
    })
}

/// Text of the first candidate, all text parts concatenated.
pub fn extract_text(data: ApiResponse) -> Result<String> {
    let candidate = match data.candidates.into_iter().next() {
        Some(c) => c,
        None => {
            let reason = data
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(ClarityError::Llm(format!("Empty response: {}", reason)));
        }
    };

    Ok(candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default())
}

// ─── API response types ──────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<ApiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiContent>,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}

#[derive(Debug, Deserialize)]
struct ApiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
