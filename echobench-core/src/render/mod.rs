//! Placeholder substitution for body templates.
//!
//! Placeholders look like `{{model}}`. String values are escaped so the
//! rendered result stays valid JSON when the template is a JSON document;
//! numbers and booleans render as their literal form. Placeholders with no
//! matching variable are left intact so optional fields can survive
//! rendering.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").expect("valid regex"));

pub type VarMap = BTreeMap<String, Value>;

/// Renders `template`, escaping string values for embedding in structured
/// text. Deterministic: no global state, same inputs always yield the same
/// output.
pub fn render(template: &str, vars: &VarMap) -> String {
    render_with(template, vars, true)
}

/// Like [`render`] but substitutes string values verbatim. Used where the
/// result is not embedded in a JSON document (multipart field values, custom
/// auth header values).
pub fn render_plain(template: &str, vars: &VarMap) -> String {
    render_with(template, vars, false)
}

fn render_with(template: &str, vars: &VarMap, escape: bool) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => literal(value, escape),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn literal(value: &Value, escape: bool) -> String {
    match value {
        Value::String(s) if escape => escape_json(s),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// JSON-escapes a string without the surrounding quotes, so it can be
/// substituted inside an already-quoted template position.
fn escape_json(s: &str) -> String {
    let quoted = serde_json::to_string(s).unwrap_or_default();
    quoted
        .strip_prefix('"')
        .and_then(|q| q.strip_suffix('"'))
        .map(str::to_string)
        .unwrap_or(quoted)
}
