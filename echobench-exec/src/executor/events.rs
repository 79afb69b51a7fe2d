use async_trait::async_trait;
use echobench_store::JobStatus;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub enum JobEvent {
    JobStarted {
        job_id: Uuid,
        total: u32,
    },
    UnitFinished {
        job_id: Uuid,
        vendor_id: String,
        repetition: u32,
        succeeded: bool,
    },
    JobPaused {
        job_id: Uuid,
    },
    JobFinished {
        job_id: Uuid,
        status: JobStatus,
    },
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: JobEvent);
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: JobEvent) {}
}

/// Emits job lifecycle events as structured tracing records.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: JobEvent) {
        match event {
            JobEvent::JobStarted { job_id, total } => {
                tracing::info!(%job_id, total, "job started");
            }
            JobEvent::UnitFinished {
                job_id,
                vendor_id,
                repetition,
                succeeded,
            } => {
                tracing::debug!(%job_id, %vendor_id, repetition, succeeded, "unit finished");
            }
            JobEvent::JobPaused { job_id } => {
                tracing::info!(%job_id, "job paused");
            }
            JobEvent::JobFinished { job_id, status } => {
                tracing::info!(%job_id, status = status.as_str(), "job finished");
            }
        }
    }
}
