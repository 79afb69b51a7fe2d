//! The template registry: built-ins plus user-defined templates behind a
//! copy-on-write snapshot, so concurrent readers never observe a partially
//! applied mutation.

mod builtin;

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::warn;

use crate::error::RegistryError;
use crate::types::{Template, TemplateProvenance, TemplateUpdate};

pub struct TemplateRegistry {
    // Mutations clone the map and swap the Arc; readers hold a snapshot.
    inner: RwLock<Arc<BTreeMap<String, Template>>>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    /// Builds a registry seeded with the built-in templates.
    pub fn new() -> Self {
        let mut map = BTreeMap::new();
        for template in builtin::builtin_templates() {
            map.insert(template.id.clone(), template);
        }
        Self {
            inner: RwLock::new(Arc::new(map)),
        }
    }

    fn snapshot(&self) -> Arc<BTreeMap<String, Template>> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn get(&self, id: &str) -> Option<Template> {
        self.snapshot().get(id).cloned()
    }

    pub fn get_all(&self) -> Vec<Template> {
        self.snapshot().values().cloned().collect()
    }

    /// Adds a user-defined template. Ids are globally unique, so any
    /// collision (built-in or user-defined) is a conflict.
    pub fn add(&self, mut template: Template) -> Result<(), RegistryError> {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.contains_key(&template.id) {
            return Err(RegistryError::Conflict(template.id));
        }
        template.provenance = TemplateProvenance::UserDefined;
        let mut map = (**guard).clone();
        map.insert(template.id.clone(), template);
        *guard = Arc::new(map);
        Ok(())
    }

    pub fn update(&self, id: &str, update: &TemplateUpdate) -> Result<(), RegistryError> {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(existing) = guard.get(id) else {
            return Err(RegistryError::NotFound(id.to_string()));
        };
        if existing.is_builtin() {
            return Err(RegistryError::NotEditable(id.to_string()));
        }
        let mut template = existing.clone();
        update.apply(&mut template);
        let mut map = (**guard).clone();
        map.insert(id.to_string(), template);
        *guard = Arc::new(map);
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<(), RegistryError> {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(existing) = guard.get(id) else {
            return Err(RegistryError::NotFound(id.to_string()));
        };
        if existing.is_builtin() {
            return Err(RegistryError::NotEditable(id.to_string()));
        }
        let mut map = (**guard).clone();
        map.remove(id);
        *guard = Arc::new(map);
        Ok(())
    }

    /// Upserts a list of raw template entries. Entries that fail validation
    /// or collide with a built-in id are skipped (and logged), never
    /// partially applied. Returns the number of imported templates. The whole
    /// batch becomes visible atomically.
    pub fn import_many(&self, entries: Vec<Value>) -> usize {
        let mut incoming = Vec::new();
        for (i, entry) in entries.into_iter().enumerate() {
            let mut template: Template = match serde_json::from_value(entry) {
                Ok(t) => t,
                Err(e) => {
                    warn!(index = i, error = %e, "skipping unparseable template entry");
                    continue;
                }
            };
            if template.id.trim().is_empty() || template.name.trim().is_empty() {
                warn!(index = i, "skipping template entry with empty id or name");
                continue;
            }
            template.provenance = TemplateProvenance::UserDefined;
            incoming.push(template);
        }

        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut map = (**guard).clone();
        let mut imported = 0;
        for template in incoming {
            if map.get(&template.id).is_some_and(Template::is_builtin) {
                warn!(id = %template.id, "skipping template entry colliding with a built-in");
                continue;
            }
            map.insert(template.id.clone(), template);
            imported += 1;
        }
        *guard = Arc::new(map);
        imported
    }

    /// Serializes the user-defined templates as a pretty JSON list, suitable
    /// for re-import.
    pub fn export_user_defined(&self) -> Result<String, serde_json::Error> {
        let templates: Vec<Template> = self
            .snapshot()
            .values()
            .filter(|t| !t.is_builtin())
            .cloned()
            .collect();
        serde_json::to_string_pretty(&templates)
    }
}
