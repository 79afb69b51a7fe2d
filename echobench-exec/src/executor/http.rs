use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;

#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    #[error("timeout")]
    Timeout,
    #[error("connect/dns/tls error: {0}")]
    Network(String),
    #[error("response too large (>{max_bytes} bytes)")]
    ResponseTooLarge { max_bytes: usize },
    #[error("http error: {0}")]
    Other(String),
}

/// One part of a multipart body.
#[derive(Debug, Clone)]
pub struct MultipartField {
    pub name: String,
    pub value: MultipartValue,
}

#[derive(Debug, Clone)]
pub enum MultipartValue {
    Text(String),
    Bytes {
        data: Vec<u8>,
        filename: String,
        content_type: String,
    },
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    /// A rendered structured-text body; the content-type header is set by
    /// the request builder.
    Json(String),
    /// Multipart form data. No content-type header is carried here: the
    /// transport sets the boundary-bearing value itself.
    Multipart(Vec<MultipartField>),
}

#[derive(Debug, Clone)]
pub struct HttpRequestParts {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: RequestBody,
}

impl HttpRequestParts {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            headers: BTreeMap::new(),
            body: RequestBody::Empty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponseParts {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    /// Milliseconds until the status line and headers arrived.
    pub ttfb_ms: Option<u64>,
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(
        &self,
        req: HttpRequestParts,
        timeout: Duration,
        max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError>;
}

pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        // Client creation should never fail in practice, but if it does, we'll
        // get a better error when trying to use it rather than panicking at
        // initialization.
        let client = reqwest::Client::builder()
            .user_agent(concat!("echobench-exec/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                panic!("failed to create reqwest HTTP client: {e}. This is a bug - please report it.");
            });
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn send(
        &self,
        req: HttpRequestParts,
        timeout: Duration,
        max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        let method: reqwest::Method = req
            .method
            .parse()
            .map_err(|e: <reqwest::Method as std::str::FromStr>::Err| {
                HttpError::Other(e.to_string())
            })?;
        let mut rb = self.client.request(method, req.url).timeout(timeout);

        for (k, v) in req.headers {
            rb = rb.header(k, v);
        }

        rb = match req.body {
            RequestBody::Empty => rb,
            RequestBody::Json(body) => rb.body(body),
            RequestBody::Multipart(fields) => rb.multipart(build_form(fields)?),
        };

        let started = Instant::now();
        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let ttfb_ms = u64::try_from(started.elapsed().as_millis()).ok();
        let status = resp.status().as_u16();

        let mut headers = BTreeMap::new();
        for (k, v) in resp.headers().iter() {
            if let Ok(s) = v.to_str() {
                headers.insert(k.to_string(), s.to_string());
            }
        }

        // Read response body with size cap.
        let body = resp.bytes().await.map_err(map_reqwest_error)?;
        if body.len() > max_response_bytes {
            return Err(HttpError::ResponseTooLarge {
                max_bytes: max_response_bytes,
            });
        }

        Ok(HttpResponseParts {
            status,
            headers,
            body: body.to_vec(),
            ttfb_ms,
        })
    }
}

fn build_form(fields: Vec<MultipartField>) -> Result<reqwest::multipart::Form, HttpError> {
    let mut form = reqwest::multipart::Form::new();
    for field in fields {
        form = match field.value {
            MultipartValue::Text(text) => form.text(field.name, text),
            MultipartValue::Bytes {
                data,
                filename,
                content_type,
            } => {
                let part = reqwest::multipart::Part::bytes(data)
                    .file_name(filename)
                    .mime_str(&content_type)
                    .map_err(|e| HttpError::Other(e.to_string()))?;
                form.part(field.name, part)
            }
        };
    }
    Ok(form)
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        return HttpError::Timeout;
    }
    if e.is_connect() || e.is_request() {
        return HttpError::Network(e.to_string());
    }
    HttpError::Other(e.to_string())
}
