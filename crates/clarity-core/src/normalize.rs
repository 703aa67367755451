//! Recover a `HealthReply` from free-form model text.
//!
//! The model is told to answer with raw JSON, but with search grounding
//! enabled the API cannot enforce a JSON response type, so replies arrive
//! wrapped in code fences or surrounded by prose. Recovery is an explicit
//! chain, tried in order:
//!
//! 1. strict parse of the whole text
//! 2. parse of the first fenced code block
//! 3. parse of the slice from the first `{` to the last `}`
//! 4. the raw text as a plain conversational answer
//!
//! The last step always succeeds, so `normalize_reply` never fails.

use clarity_types::{lenient, message::Provider, price::PriceData, reply::HealthReply};
use serde_json::{Map, Value};

const FENCE: &str = "```";

pub fn normalize_reply(raw: &str) -> HealthReply {
    let text = raw.trim();

    if let Some(reply) = parse_reply(text) {
        return reply;
    }

    let fenced = fenced_block(text);
    if let Some(reply) = fenced.and_then(parse_reply) {
        return reply;
    }

    let scope = fenced.unwrap_or(text);
    if let Some(reply) = brace_slice(scope).and_then(parse_reply) {
        return reply;
    }
    if fenced.is_some() {
        if let Some(reply) = brace_slice(text).and_then(parse_reply) {
            return reply;
        }
    }

    log::warn!("Model reply is not JSON, falling back to raw text");
    HealthReply::plain_text(raw)
}

/// Body of the first ```` ``` ```` block, without its language tag.
pub fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find(FENCE)?;
    let after_open = &text[open + FENCE.len()..];
    let close = after_open.find(FENCE)?;
    let inner = &after_open[..close];

    // Drop an info string such as `json` on the opening line
    let body = match inner.split_once('\n') {
        Some((tag, rest)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => rest,
        _ => inner,
    };
    Some(body.trim())
}

/// Slice from the first `{` to the last `}`, inclusive.
pub fn brace_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_reply(candidate: &str) -> Option<HealthReply> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(reply_from_object(map)),
        _ => None,
    }
}

/// Once an object parses it is the reply. Each field is read on its own:
/// nulls and wrong types count as absent, and a provider or `data` block
/// that does not decode is dropped without taking the rest with it.
fn reply_from_object(mut map: Map<String, Value>) -> HealthReply {
    let is_medical_query = map
        .get("isMedicalQuery")
        .and_then(lenient::bool_value)
        .unwrap_or(false);

    let conversational_response = match map.remove("conversationalResponse") {
        Some(Value::String(text)) => text,
        _ => String::new(),
    };

    let suggested_prompts = match map.remove("suggestedPrompts") {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(prompt) => Some(prompt),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    let providers = match map.remove("providers") {
        Some(Value::Array(items)) => items.into_iter().filter_map(provider_from_value).collect(),
        _ => Vec::new(),
    };

    let data = map
        .remove("data")
        .filter(|value| !value.is_null())
        .and_then(|value| match PriceData::from_model_value(value) {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("Dropping malformed price data: {}", e);
                None
            }
        });

    HealthReply {
        is_medical_query,
        conversational_response,
        suggested_prompts,
        providers,
        data,
    }
}

fn provider_from_value(mut value: Value) -> Option<Provider> {
    lenient::strip_nulls(&mut value);
    match serde_json::from_value(value) {
        Ok(provider) => Some(provider),
        Err(e) => {
            log::warn!("Skipping provider entry: {}", e);
            None
        }
    }
}
