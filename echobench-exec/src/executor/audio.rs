//! Audio payload normalization in both directions.
//!
//! Some vendors inline audio as base64 or hex text, some return the bytes as
//! the response body, and some omit the inline payload for large clips and
//! return a fetchable URL instead. The decode path tries inline first and
//! falls back to a secondary fetch.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use echobench_core::extract::extract_str;
use echobench_core::types::{AudioEncoding, Template};
use serde_json::Value;

use crate::executor::call::CallError;
use crate::executor::http::{HttpClient, HttpRequestParts};

/// Size cap for fetched audio payloads.
pub const MAX_AUDIO_BYTES: usize = 32 * 1024 * 1024;

/// Encodes audio bytes into the inline textual form used in JSON request
/// bodies.
pub fn encode_inline(bytes: &[u8], encoding: AudioEncoding) -> Result<String, CallError> {
    match encoding {
        AudioEncoding::Base64 => Ok(BASE64.encode(bytes)),
        AudioEncoding::Hex => Ok(hex::encode(bytes)),
        other => Err(CallError::Configuration(format!(
            "{other:?} is not an inline audio encoding"
        ))),
    }
}

pub fn decode_inline(text: &str, encoding: AudioEncoding) -> Result<Vec<u8>, CallError> {
    match encoding {
        AudioEncoding::Base64 => BASE64
            .decode(text)
            .map_err(|e| CallError::Extraction(format!("invalid base64 audio payload: {e}"))),
        AudioEncoding::Hex => hex::decode(text)
            .map_err(|e| CallError::Extraction(format!("invalid hex audio payload: {e}"))),
        other => Err(CallError::Extraction(format!(
            "{other:?} audio has no inline form"
        ))),
    }
}

/// Pulls audio bytes out of a parsed response tree per the template's
/// declared paths: inline payload first, then the URL-reference fallback.
pub async fn decode_from_response(
    http: &dyn HttpClient,
    tree: &Value,
    template: &Template,
    timeout: Duration,
) -> Result<Vec<u8>, CallError> {
    if let Some(path) = &template.response_audio_path {
        if let Some(inline) = extract_str(tree, path) {
            return decode_inline(inline, template.response_audio_encoding);
        }
    }

    if let Some(url) = audio_url(tree, template) {
        let resp = http
            .send(HttpRequestParts::get(url.clone()), timeout, MAX_AUDIO_BYTES)
            .await?;
        if !(200..300).contains(&resp.status) {
            return Err(CallError::Extraction(format!(
                "audio url fetch failed with status {}",
                resp.status
            )));
        }
        if resp.body.is_empty() {
            return Err(CallError::Extraction(format!(
                "audio url '{url}' returned an empty body"
            )));
        }
        return Ok(resp.body);
    }

    Err(CallError::Extraction(
        "response carries neither inline audio nor an audio url".to_string(),
    ))
}

fn audio_url(tree: &Value, template: &Template) -> Option<String> {
    let path = match &template.response_audio_url_path {
        Some(explicit) => explicit.clone(),
        None => sibling_url_path(template.response_audio_path.as_deref()?),
    };
    extract_str(tree, &path).map(str::to_string)
}

/// `data.audio` -> `data.url`; a bare `audio` -> `url`.
fn sibling_url_path(audio_path: &str) -> String {
    match audio_path.rsplit_once('.') {
        Some((prefix, _)) => format!("{prefix}.url"),
        None => "url".to_string(),
    }
}
