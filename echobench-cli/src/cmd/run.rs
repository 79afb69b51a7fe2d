use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use echobench_core::types::{CallHints, CallInput};
use echobench_exec::executor::events::TracingEventSink;
use echobench_exec::{JobConfig, JobError, JobManager, JobSpec, NoCost, ReqwestHttpClient};
use echobench_store::{Artifact, AssetStore, JobStatus, MemoryStore, RecordStore};
use serde::Serialize;

use crate::cmd::registry_with_overlay;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{JobArgs, OutputArgs};

#[derive(Serialize)]
struct UnitRow {
    vendor_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    voice_id: Option<String>,
    repetition: u32,
    input_index: usize,
    status: String,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttfb_ms: Option<u64>,
    cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct RunResult {
    job_id: String,
    status: String,
    total: u32,
    completed: u32,
    failed: u32,
    results: Vec<UnitRow>,
}

#[allow(clippy::too_many_arguments)]
pub async fn run_cmd(
    vendors: &[String],
    texts: &[String],
    audio_paths: &[PathBuf],
    repetitions: u32,
    job: JobArgs,
    templates: Option<&Path>,
    out_dir: Option<&Path>,
    output: OutputArgs,
) -> i32 {
    let registry = match registry_with_overlay(templates, output.format, output.quiet) {
        Ok(r) => r,
        Err(code) => return code,
    };

    let mut inputs: Vec<CallInput> = texts
        .iter()
        .map(|t| CallInput::Text(t.clone()))
        .collect();
    for path in audio_paths {
        match std::fs::read(path) {
            Ok(bytes) => inputs.push(CallInput::Audio(bytes)),
            Err(e) => {
                print_error(
                    output.format,
                    output.quiet,
                    &format!("cannot read {}: {e}", path.display()),
                );
                return exit_codes::USAGE_ERROR;
            }
        }
    }

    let store = Arc::new(MemoryStore::new());
    let manager = JobManager::new(
        JobConfig {
            unit_concurrency: job.concurrency,
            call_timeout: Duration::from_millis(job.timeout),
        },
        store.clone(),
        store.clone(),
        Arc::new(ReqwestHttpClient::default()),
        Arc::new(registry),
        Arc::new(NoCost),
        Arc::new(TracingEventSink),
    );

    let spec = JobSpec {
        vendor_ids: vendors.to_vec(),
        inputs,
        repetitions,
        hints: CallHints {
            language: job.language.clone(),
            format: job.audio_format.clone(),
            speed: job.speed,
            pitch: None,
            volume: None,
        },
    };

    let job_id = match manager.start_job(spec).await {
        Ok(id) => id,
        Err(JobError::InvalidSpec(message)) => {
            print_error(output.format, output.quiet, &message);
            return exit_codes::USAGE_ERROR;
        }
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to start job: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let progress = loop {
        match manager.progress(job_id).await {
            Ok(p) if p.status.is_terminal() => break p,
            Ok(_) => tokio::time::sleep(Duration::from_millis(100)).await,
            Err(e) => {
                print_error(output.format, output.quiet, &format!("lost track of job: {e}"));
                return exit_codes::RUNTIME_ERROR;
            }
        }
    };

    let records = match store.list_results(job_id).await {
        Ok(r) => r,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to read results: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let artifact = match &record.artifact {
            Some(Artifact::Text(text)) => Some(text.clone()),
            Some(Artifact::AudioRef(reference)) => {
                match materialize_audio(store.as_ref(), reference, out_dir).await {
                    Ok(display) => Some(display),
                    Err(message) => {
                        print_error(output.format, output.quiet, &message);
                        return exit_codes::RUNTIME_ERROR;
                    }
                }
            }
            None => None,
        };
        rows.push(UnitRow {
            vendor_id: record.vendor_id,
            model_id: record.model_id,
            voice_id: record.voice_id,
            repetition: record.repetition,
            input_index: record.input_index,
            status: record.status.as_str().to_string(),
            elapsed_ms: record.elapsed_ms,
            ttfb_ms: record.ttfb_ms,
            cost: record.cost,
            artifact,
            error: record.error,
        });
    }

    let result = RunResult {
        job_id: job_id.to_string(),
        status: progress.status.as_str().to_string(),
        total: progress.total,
        completed: progress.completed,
        failed: progress.failed,
        results: rows,
    };

    if output.format == OutputFormat::Text && !output.quiet {
        print_text(&result);
    } else {
        print_result(output.format, output.quiet, &result);
    }

    if progress.status == JobStatus::Completed && progress.failed == 0 {
        exit_codes::SUCCESS
    } else {
        exit_codes::BATCH_FAILED
    }
}

/// Writes the synthesized clip into `out_dir` when given, otherwise keeps
/// the in-memory reference for display.
async fn materialize_audio(
    store: &MemoryStore,
    reference: &str,
    out_dir: Option<&Path>,
) -> Result<String, String> {
    let Some(dir) = out_dir else {
        return Ok(reference.to_string());
    };
    let bytes = store
        .retrieve(reference)
        .await
        .map_err(|e| format!("failed to load audio {reference}: {e}"))?;
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("cannot create {}: {e}", dir.display()))?;
    let path = dir.join(reference);
    std::fs::write(&path, bytes).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    Ok(path.display().to_string())
}

/// Shortens long values for terminal display. The stored records keep the
/// full text; only the text renderer clips.
fn clipped(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        let mut shown: String = value.chars().take(max_chars).collect();
        shown.push_str("...");
        shown
    } else {
        value.to_string()
    }
}

fn print_text(result: &RunResult) {
    println!("Job: {}", result.job_id);
    println!("Status: {}", result.status);
    println!(
        "Units: {} total, {} succeeded, {} failed",
        result.total, result.completed, result.failed
    );
    println!();
    for row in &result.results {
        let label = match &row.model_id {
            Some(model) => format!("{} ({model})", row.vendor_id),
            None => row.vendor_id.clone(),
        };
        print!(
            "  [{}] input {} rep {} - {} in {}ms",
            label, row.input_index, row.repetition, row.status, row.elapsed_ms
        );
        if let Some(ttfb) = row.ttfb_ms {
            print!(" (ttfb {ttfb}ms)");
        }
        println!();
        if let Some(artifact) = &row.artifact {
            println!("      -> {}", clipped(artifact, 120));
        }
        if let Some(error) = &row.error {
            println!("      !! {}", clipped(error, 500));
        }
    }
}
