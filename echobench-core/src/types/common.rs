use serde::{Deserialize, Serialize};

/// The two classes of speech service a vendor call can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Audio in, text out.
    Recognition,
    /// Text in, audio out.
    Synthesis,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Recognition => "recognition",
            ServiceKind::Synthesis => "synthesis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`.
    Bearer,
    /// Key sent verbatim in one or more vendor-named headers.
    ApiKey,
    /// A `"Name: value"` pattern configured per vendor, rendered and set verbatim.
    Custom,
}

impl AuthScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthScheme::Bearer => "bearer",
            AuthScheme::ApiKey => "api-key",
            AuthScheme::Custom => "custom",
        }
    }
}

/// How audio bytes appear in a vendor response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioEncoding {
    Base64,
    Hex,
    /// The response carries a fetchable URL instead of inline bytes.
    UrlReference,
    /// The response body itself is the audio.
    RawBinary,
    /// Chunked binary; by the time the engine sees it the chunks are already
    /// accumulated, so it is handled like raw binary.
    Streamed,
}

/// Wire format of the request body for one service kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    Json,
    Multipart,
}
