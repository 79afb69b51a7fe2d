mod trait_store;
mod types;

pub use trait_store::{AssetStore, RecordStore, StoreError};
pub use types::{Artifact, CurrentUnit, JobRecord, JobStatus, NewResult, ResultRecord, ResultStatus};
