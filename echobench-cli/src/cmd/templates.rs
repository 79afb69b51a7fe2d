use std::path::Path;
use std::time::Duration;

use echobench_core::types::ServiceKind;
use echobench_core::TemplateRegistry;
use echobench_exec::{load_remote_templates, ReqwestHttpClient};
use serde::Serialize;

use crate::cmd::registry_with_overlay;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::OutputArgs;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct TemplateRow {
    id: String,
    name: String,
    kinds: Vec<&'static str>,
    auth_scheme: String,
    builtin: bool,
}

#[derive(Serialize)]
struct TemplateList {
    templates: Vec<TemplateRow>,
}

pub async fn list_cmd(overlay: Option<&Path>, output: OutputArgs) -> i32 {
    let registry = match registry_with_overlay(overlay, output.format, output.quiet) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let result = TemplateList {
        templates: rows(&registry),
    };

    if output.format == OutputFormat::Text && !output.quiet {
        for row in &result.templates {
            let origin = if row.builtin { "builtin" } else { "user" };
            println!(
                "{:<16} {:<24} {:<10} [{}] {}",
                row.id,
                row.name,
                row.auth_scheme,
                row.kinds.join(", "),
                origin
            );
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }
    exit_codes::SUCCESS
}

pub async fn export_cmd(overlay: Option<&Path>, output: OutputArgs) -> i32 {
    let registry = match registry_with_overlay(overlay, output.format, output.quiet) {
        Ok(r) => r,
        Err(code) => return code,
    };
    match registry.export_user_defined() {
        Ok(json) => {
            if !output.quiet {
                println!("{json}");
            }
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("export failed: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}

#[derive(Serialize)]
struct ImportResult {
    imported: usize,
    skipped: usize,
}

/// Imports a template file into a fresh registry, reporting how many
/// entries pass validation. Serves as a dry-run check for files later
/// passed to `--templates`.
pub async fn import_cmd(path: &Path, output: OutputArgs) -> i32 {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("cannot read {}: {e}", path.display()));
            return exit_codes::USAGE_ERROR;
        }
    };
    let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("{} is not a JSON array of templates: {e}", path.display()),
            );
            return exit_codes::USAGE_ERROR;
        }
    };

    let total = entries.len();
    let registry = TemplateRegistry::new();
    let imported = registry.import_many(entries);
    print_result(
        output.format,
        output.quiet,
        &ImportResult {
            imported,
            skipped: total - imported,
        },
    );
    exit_codes::SUCCESS
}

#[derive(Serialize)]
struct FetchResult {
    url: String,
    imported: usize,
}

pub async fn fetch_cmd(url: &str, output: OutputArgs) -> i32 {
    let registry = TemplateRegistry::new();
    let http = ReqwestHttpClient::default();
    match load_remote_templates(&http, &registry, url, FETCH_TIMEOUT).await {
        Ok(imported) => {
            print_result(
                output.format,
                output.quiet,
                &FetchResult {
                    url: url.to_string(),
                    imported,
                },
            );
            exit_codes::SUCCESS
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("fetch failed: {e}"));
            exit_codes::RUNTIME_ERROR
        }
    }
}

fn rows(registry: &TemplateRegistry) -> Vec<TemplateRow> {
    registry
        .get_all()
        .into_iter()
        .map(|t| {
            let kinds = [ServiceKind::Recognition, ServiceKind::Synthesis]
                .into_iter()
                .filter(|k| t.supports(*k))
                .map(|k| k.as_str())
                .collect();
            TemplateRow {
                builtin: t.is_builtin(),
                auth_scheme: t.auth_scheme.as_str().to_string(),
                kinds,
                id: t.id,
                name: t.name,
            }
        })
        .collect()
}
