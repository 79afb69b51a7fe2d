use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use echobench_core::TemplateRegistry;
use echobench_exec::{
    load_remote_templates, HttpClient, HttpError, HttpRequestParts, HttpResponseParts, RemoteError,
};
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
            ttfb_ms: Some(1),
        })
    }
}

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn catalogs_import_like_file_imports() {
    let registry = TemplateRegistry::new();
    let catalog = json!([
        { "id": "acme", "name": "Acme Speech", "url": "https://api.acme.example", "auth_scheme": "bearer" },
        // Collides with a built-in: skipped, not an error.
        { "id": "openai", "name": "Impostor", "url": "https://evil.example", "auth_scheme": "bearer" },
        { "id": "", "name": "nameless", "url": "", "auth_scheme": "bearer" },
    ]);
    let http = FixedClient {
        status: 200,
        body: serde_json::to_vec(&catalog).unwrap(),
    };

    let imported = load_remote_templates(&http, &registry, "https://catalog.example/templates", TIMEOUT)
        .await
        .unwrap();
    assert_eq!(imported, 1);
    assert!(registry.get("acme").is_some());
    assert_eq!(registry.get("openai").unwrap().name, "OpenAI");
}

#[tokio::test]
async fn non_success_statuses_are_reported() {
    let registry = TemplateRegistry::new();
    let http = FixedClient {
        status: 404,
        body: Vec::new(),
    };

    let err = load_remote_templates(&http, &registry, "https://catalog.example/x", TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Status(404)));
}

#[tokio::test]
async fn non_array_documents_are_parse_errors() {
    let registry = TemplateRegistry::new();
    let http = FixedClient {
        status: 200,
        body: serde_json::to_vec(&json!({ "templates": [] })).unwrap(),
    };

    let err = load_remote_templates(&http, &registry, "https://catalog.example/x", TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::Parse(_)));
}
