#![forbid(unsafe_code)]

pub mod memory;
pub mod store;

pub use crate::memory::MemoryStore;
pub use crate::store::{
    Artifact, AssetStore, CurrentUnit, JobRecord, JobStatus, NewResult, RecordStore, ResultRecord,
    ResultStatus, StoreError,
};
