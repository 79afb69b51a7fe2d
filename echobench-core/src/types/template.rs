use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{AudioEncoding, AuthScheme, BodyFormat, ServiceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateProvenance {
    BuiltIn,
    UserDefined,
}

impl Default for TemplateProvenance {
    fn default() -> Self {
        TemplateProvenance::UserDefined
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Declarative description of one vendor API shape: how to address it, how to
/// authenticate, how to encode the request body, and where to find the
/// interesting pieces of the response. Reusable across many vendor
/// configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    /// Default endpoint base URL; a vendor configuration may override it.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    pub auth_scheme: AuthScheme,
    /// Body template per service kind, with `{{name}}` placeholders.
    #[serde(default)]
    pub body_templates: BTreeMap<ServiceKind, String>,
    #[serde(default)]
    pub body_formats: BTreeMap<ServiceKind, BodyFormat>,
    /// Endpoint fixup rules: appended to the base URL when it does not
    /// already point at the sub-resource for the requested kind.
    #[serde(default)]
    pub path_suffixes: BTreeMap<ServiceKind, String>,
    /// Header names that receive the key under the `api-key` scheme. Some
    /// vendors require more than one variant at once.
    #[serde(default)]
    pub api_key_headers: Vec<String>,
    /// Default `"Name: value"` pattern for the `custom` scheme; a vendor
    /// configuration may override it.
    #[serde(default)]
    pub custom_auth_template: Option<String>,
    /// Field name the audio attachment is sent under in multipart bodies.
    #[serde(default = "default_audio_field")]
    pub audio_field: String,
    #[serde(default)]
    pub response_text_path: Option<String>,
    #[serde(default)]
    pub response_audio_path: Option<String>,
    #[serde(default = "default_audio_encoding")]
    pub response_audio_encoding: AudioEncoding,
    /// Where to find a fetchable audio URL when the inline payload is absent.
    /// Defaults to the sibling `url` field of `response_audio_path`.
    #[serde(default)]
    pub response_audio_url_path: Option<String>,
    #[serde(default)]
    pub error_message_path: Option<String>,
    #[serde(default)]
    pub models: BTreeMap<ServiceKind, Vec<ModelInfo>>,
    #[serde(default)]
    pub default_models: BTreeMap<ServiceKind, String>,
    #[serde(default)]
    pub voices: Vec<VoiceInfo>,
    #[serde(default)]
    pub allow_custom_model: bool,
    #[serde(default)]
    pub provenance: TemplateProvenance,
}

fn default_method() -> String {
    "POST".to_string()
}

fn default_audio_field() -> String {
    "file".to_string()
}

fn default_audio_encoding() -> AudioEncoding {
    AudioEncoding::Base64
}

impl Template {
    pub fn is_builtin(&self) -> bool {
        self.provenance == TemplateProvenance::BuiltIn
    }

    pub fn supports(&self, kind: ServiceKind) -> bool {
        self.body_templates.contains_key(&kind)
    }

    pub fn body_format(&self, kind: ServiceKind) -> BodyFormat {
        self.body_formats.get(&kind).copied().unwrap_or(BodyFormat::Json)
    }

    pub fn default_model(&self, kind: ServiceKind) -> Option<&str> {
        self.default_models.get(&kind).map(String::as_str)
    }
}

/// Partial update applied to a user-defined template. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub auth_scheme: Option<AuthScheme>,
    pub body_templates: Option<BTreeMap<ServiceKind, String>>,
    pub body_formats: Option<BTreeMap<ServiceKind, BodyFormat>>,
    pub response_text_path: Option<String>,
    pub response_audio_path: Option<String>,
    pub response_audio_encoding: Option<AudioEncoding>,
    pub error_message_path: Option<String>,
    pub default_models: Option<BTreeMap<ServiceKind, String>>,
    pub allow_custom_model: Option<bool>,
}

impl TemplateUpdate {
    pub fn apply(&self, template: &mut Template) {
        if let Some(v) = &self.name {
            template.name = v.clone();
        }
        if let Some(v) = &self.url {
            template.url = v.clone();
        }
        if let Some(v) = &self.method {
            template.method = v.clone();
        }
        if let Some(v) = self.auth_scheme {
            template.auth_scheme = v;
        }
        if let Some(v) = &self.body_templates {
            template.body_templates = v.clone();
        }
        if let Some(v) = &self.body_formats {
            template.body_formats = v.clone();
        }
        if let Some(v) = &self.response_text_path {
            template.response_text_path = Some(v.clone());
        }
        if let Some(v) = &self.response_audio_path {
            template.response_audio_path = Some(v.clone());
        }
        if let Some(v) = self.response_audio_encoding {
            template.response_audio_encoding = v;
        }
        if let Some(v) = &self.error_message_path {
            template.error_message_path = Some(v.clone());
        }
        if let Some(v) = &self.default_models {
            template.default_models = v.clone();
        }
        if let Some(v) = self.allow_custom_model {
            template.allow_custom_model = v;
        }
    }
}
