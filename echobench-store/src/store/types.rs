use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Paused,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Paused => "paused",
        }
    }

    /// Completed and failed jobs accept no further mutation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// The unit currently being processed, for progress display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUnit {
    pub vendor_id: String,
    pub repetition: u32,
    pub input_index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub id: Uuid,
    pub status: JobStatus,
    pub total: u32,
    pub completed: u32,
    pub failed: u32,
    pub current: Option<CurrentUnit>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Failed,
}

impl ResultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultStatus::Success => "success",
            ResultStatus::Failed => "failed",
        }
    }
}

/// What a successful unit produced: transcribed text, or a reference to
/// synthesized audio persisted through the asset store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Artifact {
    Text(String),
    AudioRef(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct NewResult {
    pub vendor_id: String,
    pub model_id: Option<String>,
    pub voice_id: Option<String>,
    /// 1-based repetition index within the unit's (input, vendor) pair.
    pub repetition: u32,
    pub input_index: usize,
    pub artifact: Option<Artifact>,
    pub elapsed_ms: u64,
    pub ttfb_ms: Option<u64>,
    pub cost: f64,
    pub status: ResultStatus,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub id: Uuid,
    pub job_id: Uuid,
    /// Append order within the job, starting at 1.
    pub seq: u32,
    pub vendor_id: String,
    pub model_id: Option<String>,
    pub voice_id: Option<String>,
    pub repetition: u32,
    pub input_index: usize,
    pub artifact: Option<Artifact>,
    pub elapsed_ms: u64,
    pub ttfb_ms: Option<u64>,
    pub cost: f64,
    pub status: ResultStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}
