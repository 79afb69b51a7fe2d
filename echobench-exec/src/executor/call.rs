//! One vendor call end-to-end: build, send, parse, extract.

use std::time::{Duration, Instant};

use echobench_core::extract::extract_str;
use echobench_core::types::{AudioEncoding, CallParams, ServiceKind, Template, VendorConfig};
use serde_json::Value;

use crate::executor::audio::decode_from_response;
use crate::executor::http::{HttpClient, HttpError, HttpResponseParts};
use crate::executor::request::build_request;

/// Size cap for vendor responses. Synthesis responses can carry whole audio
/// clips inline.
pub const MAX_RESPONSE_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Missing URL, key material, or body template. Detected before any
    /// transport happens.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The vendor answered with a non-success status or a business error.
    #[error("vendor error (status {status}): {message}")]
    Vendor { status: u16, message: String },
    /// The response arrived but did not match the template's declared shape.
    #[error("extraction error: {0}")]
    Extraction(String),
    #[error(transparent)]
    Transport(#[from] HttpError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallArtifact {
    Text(String),
    Audio(Vec<u8>),
}

#[derive(Debug, Clone)]
pub struct CallSuccess {
    pub artifact: CallArtifact,
    pub elapsed_ms: u64,
    pub ttfb_ms: Option<u64>,
}

/// Executes one call. Vendor-side business failures come back as `Err`
/// variants carrying the verbatim failure reason; the orchestrator converts
/// them into failed results without aborting the batch.
pub async fn execute_call(
    http: &dyn HttpClient,
    template: &Template,
    vendor: &VendorConfig,
    params: &CallParams,
    timeout: Duration,
) -> Result<CallSuccess, CallError> {
    let parts = build_request(template, vendor, params)?;

    let started = Instant::now();
    let resp = http.send(parts, timeout, MAX_RESPONSE_BYTES).await?;

    if !(200..300).contains(&resp.status) {
        return Err(CallError::Vendor {
            status: resp.status,
            message: vendor_error_message(&resp, template),
        });
    }

    let artifact = match params.kind {
        ServiceKind::Recognition => CallArtifact::Text(extract_text(&resp, template)?),
        ServiceKind::Synthesis => {
            CallArtifact::Audio(extract_audio(http, &resp, template, timeout).await?)
        }
    };

    Ok(CallSuccess {
        artifact,
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        ttfb_ms: resp.ttfb_ms,
    })
}

fn extract_text(resp: &HttpResponseParts, template: &Template) -> Result<String, CallError> {
    let tree = parse_body(resp)?;
    let Some(path) = &template.response_text_path else {
        return Err(CallError::Configuration(format!(
            "template '{}' has no response text path",
            template.id
        )));
    };
    extract_str(&tree, path)
        .map(str::to_string)
        .ok_or_else(|| {
            CallError::Extraction(format!("no text at response path '{path}'"))
        })
}

async fn extract_audio(
    http: &dyn HttpClient,
    resp: &HttpResponseParts,
    template: &Template,
    timeout: Duration,
) -> Result<Vec<u8>, CallError> {
    match template.response_audio_encoding {
        // The body itself is the audio.
        AudioEncoding::RawBinary | AudioEncoding::Streamed => {
            if resp.body.is_empty() {
                return Err(CallError::Extraction(
                    "vendor returned an empty audio body".to_string(),
                ));
            }
            Ok(resp.body.clone())
        }
        _ => {
            let tree = parse_body(resp)?;
            decode_from_response(http, &tree, template, timeout).await
        }
    }
}

fn parse_body(resp: &HttpResponseParts) -> Result<Value, CallError> {
    serde_json::from_slice(&resp.body)
        .map_err(|e| CallError::Extraction(format!("response is not valid JSON: {e}")))
}

/// Best-effort error message for a non-success response: the template's
/// error path if it matches, otherwise the raw body, otherwise the bare
/// status. The body is kept verbatim; any shortening happens at display
/// time only.
fn vendor_error_message(resp: &HttpResponseParts, template: &Template) -> String {
    if let Some(path) = &template.error_message_path {
        if let Ok(tree) = serde_json::from_slice::<Value>(&resp.body) {
            if let Some(message) = extract_str(&tree, path) {
                return message.to_string();
            }
        }
    }
    let trimmed = String::from_utf8_lossy(&resp.body).trim().to_string();
    if trimmed.is_empty() {
        format!("HTTP {}", resp.status)
    } else {
        trimmed
    }
}
