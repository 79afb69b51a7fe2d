use async_trait::async_trait;
use echobench_core::types::{VendorConfig, VendorUpdate};
use echobench_core::RegistryError;
use uuid::Uuid;

use crate::store::types::*;

/// The persistence boundary. The engine assumes nothing about the storage
/// technology beyond these operations; a result write is durable once
/// `append_result` returns.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_job(&self, total: u32) -> Result<JobRecord, StoreError>;

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRecord>, StoreError>;

    /// Queued -> Running, stamping `started_at`.
    async fn mark_job_started(&self, id: Uuid) -> Result<(), StoreError>;

    async fn set_job_status(&self, id: Uuid, status: JobStatus) -> Result<(), StoreError>;

    /// Sets a terminal status and stamps `completed_at`.
    async fn mark_job_finished(&self, id: Uuid, status: JobStatus) -> Result<(), StoreError>;

    async fn set_current_unit(
        &self,
        id: Uuid,
        unit: Option<CurrentUnit>,
    ) -> Result<(), StoreError>;

    /// Appends a result (append-only, ordered by submission) and bumps the
    /// job's completed or failed counter in the same operation.
    async fn append_result(
        &self,
        job_id: Uuid,
        result: NewResult,
    ) -> Result<ResultRecord, StoreError>;

    async fn list_results(&self, job_id: Uuid) -> Result<Vec<ResultRecord>, StoreError>;

    async fn upsert_vendor(&self, config: VendorConfig) -> Result<(), StoreError>;

    /// Applies a partial update to a stored vendor. System-provisioned
    /// vendors accept only the allow-listed fields; anything else fails
    /// with `NotEditable`.
    async fn update_vendor(&self, id: &str, update: &VendorUpdate) -> Result<(), StoreError>;

    async fn get_vendor(&self, id: &str) -> Result<Option<VendorConfig>, StoreError>;

    async fn list_vendors(&self) -> Result<Vec<VendorConfig>, StoreError>;

    async fn delete_vendor(&self, id: &str) -> Result<(), StoreError>;
}

/// The static asset boundary: opaque binary blobs addressed by generated
/// references, used for synthesized audio.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn store(&self, bytes: &[u8], extension: &str) -> Result<String, StoreError>;

    async fn retrieve(&self, reference: &str) -> Result<Vec<u8>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("'{0}' is not editable")]
    NotEditable(String),
    #[error("store error: {0}")]
    Other(String),
}

impl From<RegistryError> for StoreError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NotEditable(id) => StoreError::NotEditable(id),
            RegistryError::NotFound(id) => StoreError::NotFound(id),
            RegistryError::Conflict(id) => StoreError::Other(format!("conflict on '{id}'")),
        }
    }
}
