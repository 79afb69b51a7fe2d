use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds the number of in-flight units within one job.
pub struct UnitLimiter {
    sem: Arc<Semaphore>,
}

impl UnitLimiter {
    pub fn new(limit: usize) -> Self {
        Self {
            sem: Arc::new(Semaphore::new(limit.max(1))),
        }
    }

    pub async fn acquire(&self) -> UnitPermit {
        // Semaphore acquire only fails when the semaphore is closed, which
        // never happens here.
        let permit = self.sem.clone().acquire_owned().await.unwrap_or_else(|_| {
            panic!("unit semaphore closed unexpectedly. This is a bug - please report it.");
        });
        UnitPermit { _permit: permit }
    }
}

pub struct UnitPermit {
    _permit: OwnedSemaphorePermit,
}
