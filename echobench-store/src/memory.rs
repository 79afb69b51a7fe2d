//! In-memory reference implementation of both boundaries, used by the CLI
//! and by tests. A single `jobs` lock guards job rows and their result
//! lists so counter updates stay atomic with the append.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use echobench_core::types::{VendorConfig, VendorUpdate};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{
    AssetStore, CurrentUnit, JobRecord, JobStatus, NewResult, RecordStore, ResultRecord,
    ResultStatus, StoreError,
};

struct JobEntry {
    record: JobRecord,
    results: Vec<ResultRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    jobs: RwLock<HashMap<Uuid, JobEntry>>,
    vendors: RwLock<BTreeMap<String, VendorConfig>>,
    assets: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_job(&self, total: u32) -> Result<JobRecord, StoreError> {
        let record = JobRecord {
            id: Uuid::new_v4(),
            status: JobStatus::Queued,
            total,
            completed: 0,
            failed: 0,
            current: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        };
        self.jobs.write().await.insert(
            record.id,
            JobEntry {
                record: record.clone(),
                results: Vec::new(),
            },
        );
        Ok(record)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRecord>, StoreError> {
        Ok(self.jobs.read().await.get(&id).map(|e| e.record.clone()))
    }

    async fn mark_job_started(&self, id: Uuid) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entry.record.status = JobStatus::Running;
        entry.record.started_at = Some(Utc::now());
        Ok(())
    }

    async fn set_job_status(&self, id: Uuid, status: JobStatus) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entry.record.status = status;
        Ok(())
    }

    async fn mark_job_finished(&self, id: Uuid, status: JobStatus) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entry.record.status = status;
        entry.record.completed_at = Some(Utc::now());
        entry.record.current = None;
        Ok(())
    }

    async fn set_current_unit(
        &self,
        id: Uuid,
        unit: Option<CurrentUnit>,
    ) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entry.record.current = unit;
        Ok(())
    }

    async fn append_result(
        &self,
        job_id: Uuid,
        result: NewResult,
    ) -> Result<ResultRecord, StoreError> {
        let mut jobs = self.jobs.write().await;
        let entry = jobs
            .get_mut(&job_id)
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;
        match result.status {
            ResultStatus::Success => entry.record.completed += 1,
            ResultStatus::Failed => entry.record.failed += 1,
        }
        let record = ResultRecord {
            id: Uuid::new_v4(),
            job_id,
            seq: entry.results.len() as u32 + 1,
            vendor_id: result.vendor_id,
            model_id: result.model_id,
            voice_id: result.voice_id,
            repetition: result.repetition,
            input_index: result.input_index,
            artifact: result.artifact,
            elapsed_ms: result.elapsed_ms,
            ttfb_ms: result.ttfb_ms,
            cost: result.cost,
            status: result.status,
            error: result.error,
            created_at: Utc::now(),
        };
        entry.results.push(record.clone());
        Ok(record)
    }

    async fn list_results(&self, job_id: Uuid) -> Result<Vec<ResultRecord>, StoreError> {
        let jobs = self.jobs.read().await;
        let entry = jobs
            .get(&job_id)
            .ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;
        Ok(entry.results.clone())
    }

    async fn upsert_vendor(&self, config: VendorConfig) -> Result<(), StoreError> {
        self.vendors.write().await.insert(config.id.clone(), config);
        Ok(())
    }

    async fn update_vendor(&self, id: &str, update: &VendorUpdate) -> Result<(), StoreError> {
        let mut vendors = self.vendors.write().await;
        let vendor = vendors
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        vendor.apply_update(update)?;
        Ok(())
    }

    async fn get_vendor(&self, id: &str) -> Result<Option<VendorConfig>, StoreError> {
        Ok(self.vendors.read().await.get(id).cloned())
    }

    async fn list_vendors(&self) -> Result<Vec<VendorConfig>, StoreError> {
        Ok(self.vendors.read().await.values().cloned().collect())
    }

    async fn delete_vendor(&self, id: &str) -> Result<(), StoreError> {
        self.vendors.write().await.remove(id);
        Ok(())
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn store(&self, bytes: &[u8], extension: &str) -> Result<String, StoreError> {
        let reference = format!("{}.{extension}", Uuid::new_v4());
        self.assets
            .write()
            .await
            .insert(reference.clone(), bytes.to_vec());
        Ok(reference)
    }

    async fn retrieve(&self, reference: &str) -> Result<Vec<u8>, StoreError> {
        self.assets
            .read()
            .await
            .get(reference)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))
    }
}
