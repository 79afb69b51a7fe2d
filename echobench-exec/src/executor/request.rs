//! Turns a template + vendor configuration + call parameters into a
//! transport-ready request.

use std::collections::BTreeMap;

use echobench_core::render::{render, render_plain, VarMap};
use echobench_core::types::{
    AudioEncoding, AuthScheme, BodyFormat, CallInput, CallParams, ServiceKind, Template,
    VendorConfig,
};
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::executor::audio::encode_inline;
use crate::executor::call::CallError;
use crate::executor::http::{HttpRequestParts, MultipartField, MultipartValue, RequestBody};

pub fn build_request(
    template: &Template,
    vendor: &VendorConfig,
    params: &CallParams,
) -> Result<HttpRequestParts, CallError> {
    let url = resolve_url(template, vendor, params.kind)?;
    let method = vendor
        .method
        .clone()
        .unwrap_or_else(|| template.method.clone());
    let vars = build_vars(template, vendor, params)?;

    let mut headers = BTreeMap::new();
    let body = build_body(template, params, &vars, &mut headers)?;
    apply_auth_headers(template, vendor, &vars, &mut headers)?;

    // Static vendor headers never override what the builder already set.
    for (k, v) in &vendor.extra_headers {
        headers.entry(k.clone()).or_insert_with(|| v.clone());
    }

    Ok(HttpRequestParts {
        method,
        url,
        headers,
        body,
    })
}

/// The model a call will use: vendor custom override (when the template
/// allows it), then the vendor's per-kind selection, then the template
/// default.
pub fn resolved_model<'a>(
    template: &'a Template,
    vendor: &'a VendorConfig,
    kind: ServiceKind,
) -> Option<&'a str> {
    if template.allow_custom_model {
        if let Some(custom) = vendor.custom_model.as_deref() {
            return Some(custom);
        }
    }
    vendor
        .selected_model(kind)
        .or_else(|| template.default_model(kind))
}

pub fn resolved_voice<'a>(template: &'a Template, vendor: &'a VendorConfig) -> Option<&'a str> {
    vendor
        .voice_id
        .as_deref()
        .or_else(|| template.voices.first().map(|v| v.id.as_str()))
}

fn resolve_url(
    template: &Template,
    vendor: &VendorConfig,
    kind: ServiceKind,
) -> Result<String, CallError> {
    let base = if vendor.url.is_empty() {
        template.url.as_str()
    } else {
        vendor.url.as_str()
    };
    if base.is_empty() {
        return Err(CallError::Configuration(format!(
            "vendor '{}' has no endpoint URL",
            vendor.id
        )));
    }
    // Endpoint fixup: generic base URLs get the kind-specific sub-resource
    // appended, unless the configured URL already points at it.
    let mut url = base.trim_end_matches('/').to_string();
    if let Some(suffix) = template.path_suffixes.get(&kind) {
        if !url.ends_with(suffix.as_str()) {
            url.push_str(suffix);
        }
    }
    url::Url::parse(&url).map_err(|e| {
        CallError::Configuration(format!("invalid endpoint URL '{url}': {e}"))
    })?;
    Ok(url)
}

fn build_vars(
    template: &Template,
    vendor: &VendorConfig,
    params: &CallParams,
) -> Result<VarMap, CallError> {
    let mut vars = VarMap::new();

    match &params.input {
        CallInput::Text(text) => {
            vars.insert("input".to_string(), Value::from(text.as_str()));
        }
        CallInput::Audio(bytes) => {
            // Inline audio is only materialized for JSON bodies; multipart
            // attaches the raw bytes instead.
            if template.body_format(params.kind) == BodyFormat::Json {
                vars.insert(
                    "audio".to_string(),
                    Value::from(encode_inline(bytes, AudioEncoding::Base64)?),
                );
            }
        }
    }

    if let Some(model) = resolved_model(template, vendor, params.kind) {
        vars.insert("model".to_string(), Value::from(model));
    }
    if let Some(voice) = resolved_voice(template, vendor) {
        vars.insert("voice".to_string(), Value::from(voice));
    }
    if let Some(language) = &params.hints.language {
        vars.insert("language".to_string(), Value::from(language.as_str()));
    }
    if let Some(format) = &params.hints.format {
        vars.insert("format".to_string(), Value::from(format.as_str()));
    }
    vars.insert(
        "speed".to_string(),
        Value::from(params.hints.speed.unwrap_or(1.0)),
    );
    vars.insert(
        "pitch".to_string(),
        Value::from(params.hints.pitch.unwrap_or(0.0)),
    );
    vars.insert(
        "volume".to_string(),
        Value::from(params.hints.volume.unwrap_or(1.0)),
    );
    vars.insert(
        "api_key".to_string(),
        Value::from(vendor.api_key.expose_secret()),
    );
    if let Some(secondary) = &vendor.secondary_id {
        vars.insert("secondary_id".to_string(), Value::from(secondary.as_str()));
    }

    Ok(vars)
}

fn build_body(
    template: &Template,
    params: &CallParams,
    vars: &VarMap,
    headers: &mut BTreeMap<String, String>,
) -> Result<RequestBody, CallError> {
    let Some(body_template) = template.body_templates.get(&params.kind) else {
        return Err(CallError::Configuration(format!(
            "template '{}' has no {} body template",
            template.id,
            params.kind.as_str()
        )));
    };

    match template.body_format(params.kind) {
        BodyFormat::Json => {
            headers.insert("content-type".to_string(), "application/json".to_string());
            Ok(RequestBody::Json(render(body_template, vars)))
        }
        BodyFormat::Multipart => {
            let fields = multipart_fields(template, body_template, params, vars)?;
            Ok(RequestBody::Multipart(fields))
        }
    }
}

/// A multipart body template is a JSON object whose values are rendered
/// individually as plain field values. Fields whose value still contains an
/// unresolved placeholder are optional and get dropped.
fn multipart_fields(
    template: &Template,
    body_template: &str,
    params: &CallParams,
    vars: &VarMap,
) -> Result<Vec<MultipartField>, CallError> {
    let parsed: Value = serde_json::from_str(body_template).map_err(|e| {
        CallError::Configuration(format!(
            "template '{}' multipart body is not a JSON object: {e}",
            template.id
        ))
    })?;
    let Value::Object(map) = parsed else {
        return Err(CallError::Configuration(format!(
            "template '{}' multipart body is not a JSON object",
            template.id
        )));
    };

    let mut fields = Vec::new();
    for (name, value) in map {
        let rendered = match value {
            Value::String(s) => render_plain(&s, vars),
            other => other.to_string(),
        };
        if rendered.contains("{{") || rendered.is_empty() {
            continue;
        }
        fields.push(MultipartField {
            name,
            value: MultipartValue::Text(rendered),
        });
    }

    if let CallInput::Audio(bytes) = &params.input {
        let format = params.hints.format.as_deref().unwrap_or("wav");
        fields.push(MultipartField {
            name: template.audio_field.clone(),
            value: MultipartValue::Bytes {
                data: bytes.clone(),
                filename: format!("audio.{format}"),
                content_type: format!("audio/{format}"),
            },
        });
    }

    Ok(fields)
}

fn apply_auth_headers(
    template: &Template,
    vendor: &VendorConfig,
    vars: &VarMap,
    headers: &mut BTreeMap<String, String>,
) -> Result<(), CallError> {
    match vendor.auth_scheme {
        AuthScheme::Bearer => {
            let key = require_key(vendor)?;
            headers.insert("Authorization".to_string(), format!("Bearer {key}"));
        }
        AuthScheme::ApiKey => {
            let key = require_key(vendor)?;
            if template.api_key_headers.is_empty() {
                return Err(CallError::Configuration(format!(
                    "template '{}' declares the api-key scheme but no key headers",
                    template.id
                )));
            }
            for header in &template.api_key_headers {
                headers.insert(header.clone(), key.clone());
            }
        }
        AuthScheme::Custom => {
            let pattern = vendor
                .custom_auth_header
                .as_deref()
                .or(template.custom_auth_template.as_deref())
                .ok_or_else(|| {
                    CallError::Configuration(format!(
                        "vendor '{}' uses the custom auth scheme but no header pattern is configured",
                        vendor.id
                    ))
                })?;
            let (name, value) = pattern.split_once(':').ok_or_else(|| {
                CallError::Configuration(format!(
                    "custom auth pattern for vendor '{}' is missing ':'",
                    vendor.id
                ))
            })?;
            if value.contains("api_key") {
                require_key(vendor)?;
            }
            headers.insert(
                name.trim().to_string(),
                render_plain(value.trim(), vars),
            );
        }
    }
    Ok(())
}

fn require_key(vendor: &VendorConfig) -> Result<String, CallError> {
    if !vendor.has_key() {
        return Err(CallError::Configuration(format!(
            "vendor '{}' has no API key configured",
            vendor.id
        )));
    }
    Ok(vendor.api_key.expose_secret().to_string())
}
