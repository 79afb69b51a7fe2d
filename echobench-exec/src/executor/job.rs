//! The batch orchestrator: N inputs x M vendors x R repetitions, with
//! failure isolation per unit and polling-based progress.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use echobench_core::types::{CallHints, CallInput, CallParams, Template, VendorConfig};
use echobench_core::TemplateRegistry;
use serde::Serialize;
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::cost::CostModel;
use crate::executor::call::{execute_call, CallArtifact, CallError, CallSuccess};
use crate::executor::concurrency::UnitLimiter;
use crate::executor::events::{EventSink, JobEvent};
use crate::executor::http::HttpClient;
use crate::executor::request::{resolved_model, resolved_voice};
use echobench_store::{
    Artifact, AssetStore, CurrentUnit, JobStatus, NewResult, RecordStore, ResultStatus, StoreError,
};

#[derive(Debug, Clone)]
pub struct JobConfig {
    /// In-flight units within one job. 1 reproduces the reference
    /// sequential behavior.
    pub unit_concurrency: usize,
    pub call_timeout: Duration,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            unit_concurrency: 1,
            call_timeout: Duration::from_secs(30),
        }
    }
}

/// What to run: every input against every vendor, `repetitions` times.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub vendor_ids: Vec<String>,
    pub inputs: Vec<CallInput>,
    pub repetitions: u32,
    pub hints: CallHints,
}

impl JobSpec {
    pub fn total_units(&self) -> u32 {
        self.inputs.len() as u32 * self.vendor_ids.len() as u32 * self.repetitions
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressSnapshot {
    pub status: JobStatus,
    pub total: u32,
    pub completed: u32,
    pub failed: u32,
    pub current: Option<CurrentUnit>,
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no job with id {0}")]
    UnknownJob(Uuid),
    #[error("invalid job spec: {0}")]
    InvalidSpec(String),
}

pub struct JobManager {
    config: JobConfig,
    store: Arc<dyn RecordStore>,
    assets: Arc<dyn AssetStore>,
    http: Arc<dyn HttpClient>,
    registry: Arc<TemplateRegistry>,
    cost: Arc<dyn CostModel>,
    events: Arc<dyn EventSink>,
}

impl JobManager {
    pub fn new(
        config: JobConfig,
        store: Arc<dyn RecordStore>,
        assets: Arc<dyn AssetStore>,
        http: Arc<dyn HttpClient>,
        registry: Arc<TemplateRegistry>,
        cost: Arc<dyn CostModel>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            config,
            store,
            assets,
            http,
            registry,
            cost,
            events,
        }
    }

    /// Creates the job record and spawns a detached worker; returns as soon
    /// as the job is queued. Callers observe progress by polling
    /// [`JobManager::progress`].
    pub async fn start_job(&self, spec: JobSpec) -> Result<Uuid, JobError> {
        if spec.vendor_ids.is_empty() {
            return Err(JobError::InvalidSpec("no vendors selected".to_string()));
        }
        if spec.inputs.is_empty() {
            return Err(JobError::InvalidSpec("no inputs provided".to_string()));
        }
        if spec.repetitions == 0 {
            return Err(JobError::InvalidSpec("repetitions must be >= 1".to_string()));
        }

        let job = self.store.create_job(spec.total_units()).await?;
        let worker = JobWorker {
            job_id: job.id,
            spec,
            config: self.config.clone(),
            store: self.store.clone(),
            assets: self.assets.clone(),
            http: self.http.clone(),
            registry: self.registry.clone(),
            cost: self.cost.clone(),
            events: self.events.clone(),
        };
        tokio::spawn(async move { worker.run().await });
        Ok(job.id)
    }

    pub async fn progress(&self, job_id: Uuid) -> Result<ProgressSnapshot, JobError> {
        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or(JobError::UnknownJob(job_id))?;
        Ok(ProgressSnapshot {
            status: job.status,
            total: job.total,
            completed: job.completed,
            failed: job.failed,
            current: job.current,
        })
    }

    /// Requests a cooperative pause. The worker checks between units, so an
    /// in-flight call completes first. No-op on terminal or already paused
    /// jobs.
    pub async fn pause(&self, job_id: Uuid) -> Result<(), JobError> {
        let job = self
            .store
            .get_job(job_id)
            .await?
            .ok_or(JobError::UnknownJob(job_id))?;
        if job.status.is_terminal() || job.status == JobStatus::Paused {
            return Ok(());
        }
        self.store.set_job_status(job_id, JobStatus::Paused).await?;
        Ok(())
    }
}

/// Stable identity and bookkeeping for one unit, independent of completion
/// order.
struct UnitIdentity {
    vendor_id: String,
    model_id: Option<String>,
    voice_id: Option<String>,
    repetition: u32,
    input_index: usize,
    usage: f64,
    audio_ext: String,
}

struct JobWorker {
    job_id: Uuid,
    spec: JobSpec,
    config: JobConfig,
    store: Arc<dyn RecordStore>,
    assets: Arc<dyn AssetStore>,
    http: Arc<dyn HttpClient>,
    registry: Arc<TemplateRegistry>,
    cost: Arc<dyn CostModel>,
    events: Arc<dyn EventSink>,
}

type UnitOutcome = (UnitIdentity, Result<CallSuccess, CallError>, u64);

impl JobWorker {
    async fn run(self) {
        let job_id = self.job_id;
        if let Err(e) = self.drive().await {
            tracing::error!(%job_id, error = %e, "job aborted by store failure");
            let _ = self.store.mark_job_finished(job_id, JobStatus::Failed).await;
            self.events
                .emit(JobEvent::JobFinished {
                    job_id,
                    status: JobStatus::Failed,
                })
                .await;
        }
    }

    async fn drive(&self) -> Result<(), StoreError> {
        self.store.mark_job_started(self.job_id).await?;
        self.events
            .emit(JobEvent::JobStarted {
                job_id: self.job_id,
                total: self.spec.total_units(),
            })
            .await;

        // Vendor and template resolution happens once per vendor; a vendor
        // that cannot be resolved fails each of its units, never the job.
        let mut resolved: BTreeMap<String, Result<(VendorConfig, Template), String>> =
            BTreeMap::new();
        for vendor_id in &self.spec.vendor_ids {
            resolved.insert(vendor_id.clone(), self.resolve_vendor(vendor_id).await?);
        }

        let limiter = UnitLimiter::new(self.config.unit_concurrency);
        let mut in_flight: JoinSet<UnitOutcome> = JoinSet::new();

        for (input_index, input) in self.spec.inputs.iter().enumerate() {
            for vendor_id in &self.spec.vendor_ids {
                for repetition in 1..=self.spec.repetitions {
                    // Cooperative pause point: only between units.
                    if self.is_paused().await? {
                        self.drain(&mut in_flight).await?;
                        self.store.set_current_unit(self.job_id, None).await?;
                        self.events
                            .emit(JobEvent::JobPaused { job_id: self.job_id })
                            .await;
                        return Ok(());
                    }

                    self.store
                        .set_current_unit(
                            self.job_id,
                            Some(CurrentUnit {
                                vendor_id: vendor_id.clone(),
                                repetition,
                                input_index,
                            }),
                        )
                        .await?;

                    match resolved.get(vendor_id) {
                        Some(Ok((vendor, template))) => {
                            let identity = UnitIdentity {
                                vendor_id: vendor_id.clone(),
                                model_id: resolved_model(template, vendor, input.kind())
                                    .map(str::to_string),
                                voice_id: resolved_voice(template, vendor).map(str::to_string),
                                repetition,
                                input_index,
                                usage: input.usage_amount(),
                                audio_ext: self
                                    .spec
                                    .hints
                                    .format
                                    .clone()
                                    .unwrap_or_else(|| "mp3".to_string()),
                            };
                            let permit = limiter.acquire().await;
                            let params =
                                CallParams::new(input.clone(), self.spec.hints.clone());
                            let http = self.http.clone();
                            let template = template.clone();
                            let vendor = vendor.clone();
                            let timeout = self.config.call_timeout;
                            in_flight.spawn(async move {
                                let started = Instant::now();
                                let outcome =
                                    execute_call(http.as_ref(), &template, &vendor, &params, timeout)
                                        .await;
                                drop(permit);
                                let elapsed_ms =
                                    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                                (identity, outcome, elapsed_ms)
                            });
                        }
                        other => {
                            let message = match other {
                                Some(Err(message)) => message.clone(),
                                _ => format!("unknown vendor '{vendor_id}'"),
                            };
                            let identity = UnitIdentity {
                                vendor_id: vendor_id.clone(),
                                model_id: None,
                                voice_id: None,
                                repetition,
                                input_index,
                                usage: input.usage_amount(),
                                audio_ext: "mp3".to_string(),
                            };
                            self.record(identity, Err(CallError::Configuration(message)), 0)
                                .await?;
                        }
                    }

                    // Opportunistically persist whatever has finished.
                    while let Some(joined) = in_flight.try_join_next() {
                        self.record_joined(joined).await?;
                    }
                }
            }
        }

        self.drain(&mut in_flight).await?;
        self.store.set_current_unit(self.job_id, None).await?;
        // Every unit has been attempted: terminal even if all of them failed.
        self.store
            .mark_job_finished(self.job_id, JobStatus::Completed)
            .await?;
        self.events
            .emit(JobEvent::JobFinished {
                job_id: self.job_id,
                status: JobStatus::Completed,
            })
            .await;
        Ok(())
    }

    async fn drain(&self, in_flight: &mut JoinSet<UnitOutcome>) -> Result<(), StoreError> {
        while let Some(joined) = in_flight.join_next().await {
            self.record_joined(joined).await?;
        }
        Ok(())
    }

    async fn record_joined(
        &self,
        joined: Result<UnitOutcome, tokio::task::JoinError>,
    ) -> Result<(), StoreError> {
        match joined {
            Ok((identity, outcome, elapsed_ms)) => self.record(identity, outcome, elapsed_ms).await,
            Err(e) => {
                // A panicked unit task still counts as an attempted unit.
                tracing::error!(job_id = %self.job_id, error = %e, "unit task panicked");
                Ok(())
            }
        }
    }

    async fn record(
        &self,
        identity: UnitIdentity,
        outcome: Result<CallSuccess, CallError>,
        elapsed_ms: u64,
    ) -> Result<(), StoreError> {
        let succeeded = outcome.is_ok();
        let result = match outcome {
            Ok(success) => {
                let artifact = match success.artifact {
                    CallArtifact::Text(text) => Artifact::Text(text),
                    CallArtifact::Audio(bytes) => {
                        let reference = self.assets.store(&bytes, &identity.audio_ext).await?;
                        Artifact::AudioRef(reference)
                    }
                };
                NewResult {
                    vendor_id: identity.vendor_id.clone(),
                    model_id: identity.model_id.clone(),
                    voice_id: identity.voice_id.clone(),
                    repetition: identity.repetition,
                    input_index: identity.input_index,
                    artifact: Some(artifact),
                    elapsed_ms: success.elapsed_ms,
                    ttfb_ms: success.ttfb_ms,
                    cost: self.cost.calculate_cost(
                        &identity.vendor_id,
                        identity.model_id.as_deref(),
                        identity.usage,
                    ),
                    status: ResultStatus::Success,
                    error: None,
                }
            }
            // The failure reason is preserved verbatim for diagnosis.
            Err(error) => NewResult {
                vendor_id: identity.vendor_id.clone(),
                model_id: identity.model_id.clone(),
                voice_id: identity.voice_id.clone(),
                repetition: identity.repetition,
                input_index: identity.input_index,
                artifact: None,
                elapsed_ms,
                ttfb_ms: None,
                cost: 0.0,
                status: ResultStatus::Failed,
                error: Some(error.to_string()),
            },
        };
        self.store.append_result(self.job_id, result).await?;
        self.events
            .emit(JobEvent::UnitFinished {
                job_id: self.job_id,
                vendor_id: identity.vendor_id,
                repetition: identity.repetition,
                succeeded,
            })
            .await;
        Ok(())
    }

    async fn is_paused(&self) -> Result<bool, StoreError> {
        Ok(self
            .store
            .get_job(self.job_id)
            .await?
            .is_some_and(|job| job.status == JobStatus::Paused))
    }

    /// Looks up a vendor in the store, falling back to environment presets.
    /// The outer error is infrastructural; the inner one fails the vendor's
    /// units.
    async fn resolve_vendor(
        &self,
        vendor_id: &str,
    ) -> Result<Result<(VendorConfig, Template), String>, StoreError> {
        let stored = self.store.get_vendor(vendor_id).await?;
        let vendor = match stored {
            Some(vendor) => vendor,
            None => {
                let presets =
                    echobench_core::types::system_presets_from_env(&self.registry.get_all());
                match presets.into_iter().find(|v| v.id == vendor_id) {
                    Some(vendor) => vendor,
                    None => return Ok(Err(format!("unknown vendor '{vendor_id}'"))),
                }
            }
        };
        if !vendor.enabled {
            return Ok(Err(format!("vendor '{vendor_id}' is disabled")));
        }
        let Some(template) = self.registry.get(&vendor.template_id) else {
            return Ok(Err(format!(
                "vendor '{vendor_id}' references unknown template '{}'",
                vendor.template_id
            )));
        };
        Ok(Ok((vendor, template)))
    }
}
