use std::collections::BTreeMap;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::common::{AuthScheme, ServiceKind};
use super::template::Template;
use crate::error::RegistryError;

const MASKED: &str = "••••••••";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VendorProvenance {
    /// Synthesized from environment presets; only a narrow field allow-list
    /// is editable.
    SystemProvisioned,
    UserDefined,
}

impl Default for VendorProvenance {
    fn default() -> Self {
        VendorProvenance::UserDefined
    }
}

/// One concrete, credentialed instance of a [`Template`]. The key material is
/// held in a [`SecretString`] and never serialized; anything crossing the
/// engine boundary goes through [`VendorConfig::masked`].
#[derive(Debug, Clone, Deserialize)]
pub struct VendorConfig {
    pub id: String,
    pub name: String,
    pub template_id: String,
    #[serde(default)]
    pub kinds: Vec<ServiceKind>,
    /// Overrides the template's default URL when non-empty.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: Option<String>,
    pub auth_scheme: AuthScheme,
    #[serde(default = "empty_secret")]
    pub api_key: SecretString,
    #[serde(default)]
    pub secondary_id: Option<String>,
    /// `"Name: value"` pattern for the `custom` scheme.
    #[serde(default)]
    pub custom_auth_header: Option<String>,
    #[serde(default)]
    pub selected_models: BTreeMap<ServiceKind, String>,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default)]
    pub custom_model: Option<String>,
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub provenance: VendorProvenance,
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn default_enabled() -> bool {
    true
}

/// External view of a vendor configuration with the key material replaced by
/// a placeholder.
#[derive(Debug, Clone, Serialize)]
pub struct MaskedVendorConfig {
    pub id: String,
    pub name: String,
    pub template_id: String,
    pub kinds: Vec<ServiceKind>,
    pub url: String,
    pub auth_scheme: AuthScheme,
    pub api_key: String,
    pub selected_models: BTreeMap<ServiceKind, String>,
    pub voice_id: Option<String>,
    pub custom_model: Option<String>,
    pub enabled: bool,
    pub provenance: VendorProvenance,
}

impl VendorConfig {
    pub fn has_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    pub fn masked(&self) -> MaskedVendorConfig {
        MaskedVendorConfig {
            id: self.id.clone(),
            name: self.name.clone(),
            template_id: self.template_id.clone(),
            kinds: self.kinds.clone(),
            url: self.url.clone(),
            auth_scheme: self.auth_scheme,
            api_key: if self.has_key() { MASKED.to_string() } else { String::new() },
            selected_models: self.selected_models.clone(),
            voice_id: self.voice_id.clone(),
            custom_model: self.custom_model.clone(),
            enabled: self.enabled,
            provenance: self.provenance,
        }
    }

    pub fn selected_model(&self, kind: ServiceKind) -> Option<&str> {
        self.selected_models.get(&kind).map(String::as_str)
    }

    /// Applies an update, enforcing the system-provisioned allow-list
    /// (selected models, voice, enabled).
    pub fn apply_update(&mut self, update: &VendorUpdate) -> Result<(), RegistryError> {
        if self.provenance == VendorProvenance::SystemProvisioned && update.touches_readonly_fields()
        {
            return Err(RegistryError::NotEditable(self.id.clone()));
        }
        if let Some(v) = &update.name {
            self.name = v.clone();
        }
        if let Some(v) = &update.url {
            self.url = v.clone();
        }
        if let Some(v) = &update.api_key {
            self.api_key = SecretString::from(v.clone());
        }
        if let Some(v) = &update.custom_model {
            self.custom_model = Some(v.clone());
        }
        if let Some(v) = &update.selected_models {
            self.selected_models = v.clone();
        }
        if let Some(v) = &update.voice_id {
            self.voice_id = Some(v.clone());
        }
        if let Some(v) = update.enabled {
            self.enabled = v;
        }
        Ok(())
    }
}

/// Partial update for a vendor configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorUpdate {
    pub name: Option<String>,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub custom_model: Option<String>,
    pub selected_models: Option<BTreeMap<ServiceKind, String>>,
    pub voice_id: Option<String>,
    pub enabled: Option<bool>,
}

impl VendorUpdate {
    fn touches_readonly_fields(&self) -> bool {
        self.name.is_some()
            || self.url.is_some()
            || self.api_key.is_some()
            || self.custom_model.is_some()
    }
}

/// Synthesizes system-provisioned vendor configurations from the environment,
/// one per template that has `ECHOBENCH_<ID>_API_KEY` set. Called at each
/// lookup rather than cached, so edits to the environment take effect without
/// a restart.
pub fn system_presets_from_env(templates: &[Template]) -> Vec<VendorConfig> {
    let mut out = Vec::new();
    for template in templates {
        let prefix = format!("ECHOBENCH_{}", template.id.to_uppercase().replace('-', "_"));
        let Ok(key) = std::env::var(format!("{prefix}_API_KEY")) else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        let url = std::env::var(format!("{prefix}_URL")).unwrap_or_default();
        let secondary_id = std::env::var(format!("{prefix}_SECONDARY_ID")).ok();
        out.push(VendorConfig {
            id: format!("env-{}", template.id),
            name: format!("{} (env)", template.name),
            template_id: template.id.clone(),
            kinds: template.body_templates.keys().copied().collect(),
            url,
            method: None,
            auth_scheme: template.auth_scheme,
            api_key: SecretString::from(key),
            secondary_id,
            custom_auth_header: None,
            selected_models: template.default_models.clone(),
            voice_id: template.voices.first().map(|v| v.id.clone()),
            custom_model: None,
            extra_headers: BTreeMap::new(),
            enabled: true,
            provenance: VendorProvenance::SystemProvisioned,
        });
    }
    out
}
