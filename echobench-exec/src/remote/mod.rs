//! Loading template collections from a remote catalog.

use std::time::Duration;

use echobench_core::TemplateRegistry;
use serde_json::Value;

use crate::executor::http::{HttpClient, HttpError, HttpRequestParts};

/// Size cap for remote catalog documents.
const MAX_CATALOG_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error(transparent)]
    Transport(#[from] HttpError),
    #[error("catalog is not a JSON array: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog fetch failed with status {0}")]
    Status(u16),
}

/// Fetches a JSON array of template definitions and imports it into the
/// registry. Entries that fail to parse or collide with built-ins are
/// skipped, the same as a file import. Returns how many templates landed.
pub async fn load_remote_templates(
    http: &dyn HttpClient,
    registry: &TemplateRegistry,
    url: &str,
    timeout: Duration,
) -> Result<usize, RemoteError> {
    let resp = http
        .send(
            HttpRequestParts::get(url.to_string()),
            timeout,
            MAX_CATALOG_BYTES,
        )
        .await?;
    if !(200..300).contains(&resp.status) {
        return Err(RemoteError::Status(resp.status));
    }
    let entries: Vec<Value> = serde_json::from_slice(&resp.body)?;
    let imported = registry.import_many(entries);
    tracing::info!(url, imported, "remote template catalog loaded");
    Ok(imported)
}
