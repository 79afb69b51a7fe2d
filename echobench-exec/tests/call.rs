use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use echobench_core::types::VendorConfig;
use echobench_core::TemplateRegistry;
use echobench_exec::executor::call::CallArtifact;
use echobench_exec::{
    execute_call, CallError, HttpClient, HttpError, HttpRequestParts, HttpResponseParts,
};
use echobench_core::types::CallParams;
use serde_json::json;

struct FixedClient {
    status: u16,
    body: Vec<u8>,
}

#[async_trait]
impl HttpClient for FixedClient {
    async fn send(
        &self,
        _req: HttpRequestParts,
        _timeout: Duration,
        _max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        Ok(HttpResponseParts {
            status: self.status,
            headers: BTreeMap::new(),
            body: self.body.clone(),
            ttfb_ms: Some(3),
        })
    }
}

struct FailingClient(HttpError);

#[async_trait]
impl HttpClient for FailingClient {
    async fn send(
        &self,
        _req: HttpRequestParts,
        _timeout: Duration,
        _max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        Err(self.0.clone())
    }
}

const TIMEOUT: Duration = Duration::from_secs(5);

fn vendor(value: serde_json::Value) -> VendorConfig {
    serde_json::from_value(value).unwrap()
}

fn openai_vendor() -> VendorConfig {
    vendor(json!({
        "id": "openai-test",
        "name": "OpenAI",
        "template_id": "openai",
        "auth_scheme": "bearer",
        "api_key": "sk-test",
    }))
}

#[tokio::test]
async fn recognition_extracts_the_transcript() {
    let registry = TemplateRegistry::new();
    let template = registry.get("openai").unwrap();
    let http = FixedClient {
        status: 200,
        body: serde_json::to_vec(&json!({ "text": "hello world" })).unwrap(),
    };

    let success = execute_call(
        &http,
        &template,
        &openai_vendor(),
        &CallParams::audio(vec![1, 2, 3]),
        TIMEOUT,
    )
    .await
    .unwrap();

    assert_eq!(
        success.artifact,
        CallArtifact::Text("hello world".to_string())
    );
    assert_eq!(success.ttfb_ms, Some(3));
}

#[tokio::test]
async fn synthesis_takes_a_raw_binary_body_directly() {
    let registry = TemplateRegistry::new();
    let template = registry.get("elevenlabs").unwrap();
    let clip = vec![0x49u8, 0x44, 0x33, 0x04];
    let http = FixedClient {
        status: 200,
        body: clip.clone(),
    };
    let v = vendor(json!({
        "id": "el",
        "name": "ElevenLabs",
        "template_id": "elevenlabs",
        "auth_scheme": "api-key",
        "api_key": "xi-secret",
    }));

    let success = execute_call(&http, &template, &v, &CallParams::text("hi"), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(success.artifact, CallArtifact::Audio(clip));
}

#[tokio::test]
async fn vendor_failures_surface_the_declared_error_path() {
    let registry = TemplateRegistry::new();
    let template = registry.get("openai").unwrap();
    let http = FixedClient {
        status: 401,
        body: serde_json::to_vec(&json!({ "error": { "message": "bad key" } })).unwrap(),
    };

    let err = execute_call(
        &http,
        &template,
        &openai_vendor(),
        &CallParams::text("hi"),
        TIMEOUT,
    )
    .await
    .unwrap_err();

    match err {
        CallError::Vendor { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "bad key");
        }
        other => panic!("expected a vendor error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparsable_error_bodies_fall_back_to_raw_text() {
    let registry = TemplateRegistry::new();
    let template = registry.get("openai").unwrap();
    let http = FixedClient {
        status: 503,
        body: b"upstream melted".to_vec(),
    };

    let err = execute_call(
        &http,
        &template,
        &openai_vendor(),
        &CallParams::text("hi"),
        TIMEOUT,
    )
    .await
    .unwrap_err();

    match err {
        CallError::Vendor { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream melted");
        }
        other => panic!("expected a vendor error, got {other:?}"),
    }
}

#[tokio::test]
async fn long_error_bodies_are_kept_verbatim() {
    let registry = TemplateRegistry::new();
    let template = registry.get("openai").unwrap();
    let body = "x".repeat(2000);
    let http = FixedClient {
        status: 500,
        body: body.clone().into_bytes(),
    };

    let err = execute_call(
        &http,
        &template,
        &openai_vendor(),
        &CallParams::text("hi"),
        TIMEOUT,
    )
    .await
    .unwrap_err();

    match err {
        CallError::Vendor { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, body);
        }
        other => panic!("expected a vendor error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_transcript_is_an_extraction_error() {
    let registry = TemplateRegistry::new();
    let template = registry.get("openai").unwrap();
    let http = FixedClient {
        status: 200,
        body: serde_json::to_vec(&json!({ "unexpected": true })).unwrap(),
    };

    let err = execute_call(
        &http,
        &template,
        &openai_vendor(),
        &CallParams::audio(vec![1]),
        TIMEOUT,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CallError::Extraction(_)));
}

#[tokio::test]
async fn timeouts_come_back_as_transport_errors() {
    let registry = TemplateRegistry::new();
    let template = registry.get("openai").unwrap();
    let http = FailingClient(HttpError::Timeout);

    let err = execute_call(
        &http,
        &template,
        &openai_vendor(),
        &CallParams::text("hi"),
        TIMEOUT,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CallError::Transport(HttpError::Timeout)));
}
