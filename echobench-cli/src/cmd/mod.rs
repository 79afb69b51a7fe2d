pub mod run;
pub mod templates;
pub mod vendors;

use std::path::Path;

use echobench_core::TemplateRegistry;

use crate::exit_codes;
use crate::output::{print_error, OutputFormat};

/// Builds a registry seeded with built-ins, importing an optional overlay
/// file of user-defined templates. Returns an exit code on failure.
pub fn registry_with_overlay(
    overlay: Option<&Path>,
    format: OutputFormat,
    quiet: bool,
) -> Result<TemplateRegistry, i32> {
    let registry = TemplateRegistry::new();
    if let Some(path) = overlay {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            print_error(format, quiet, &format!("cannot read {}: {e}", path.display()));
            exit_codes::USAGE_ERROR
        })?;
        let entries: Vec<serde_json::Value> = serde_json::from_str(&raw).map_err(|e| {
            print_error(
                format,
                quiet,
                &format!("{} is not a JSON array of templates: {e}", path.display()),
            );
            exit_codes::USAGE_ERROR
        })?;
        let imported = registry.import_many(entries);
        tracing::debug!(path = %path.display(), imported, "template overlay loaded");
    }
    Ok(registry)
}
