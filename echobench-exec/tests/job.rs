use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use echobench_core::types::{CallHints, CallInput, VendorConfig};
use echobench_core::TemplateRegistry;
use echobench_exec::executor::events::NoOpEventSink;
use echobench_exec::{
    HttpClient, HttpError, HttpRequestParts, HttpResponseParts, JobConfig, JobError, JobManager,
    JobSpec, NoCost, ProgressSnapshot,
};
use echobench_store::{Artifact, AssetStore, JobStatus, MemoryStore, RecordStore, ResultStatus};
use serde_json::json;
use uuid::Uuid;

/// Routes by host: `a.test` answers with raw audio, everything else fails
/// with a vendor error.
struct RoutedClient;

#[async_trait]
impl HttpClient for RoutedClient {
    async fn send(
        &self,
        req: HttpRequestParts,
        _timeout: Duration,
        _max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        if req.url.starts_with("https://a.test") {
            Ok(HttpResponseParts {
                status: 200,
                headers: BTreeMap::new(),
                body: vec![1, 2, 3],
                ttfb_ms: Some(1),
            })
        } else {
            Ok(HttpResponseParts {
                status: 500,
                headers: BTreeMap::new(),
                body: serde_json::to_vec(&json!({ "detail": { "message": "boom" } })).unwrap(),
                ttfb_ms: Some(1),
            })
        }
    }
}

/// Answers every request with raw audio after a short delay, slow enough for
/// a test to interleave control calls between units.
struct SlowClient {
    delay: Duration,
}

#[async_trait]
impl HttpClient for SlowClient {
    async fn send(
        &self,
        _req: HttpRequestParts,
        _timeout: Duration,
        _max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        tokio::time::sleep(self.delay).await;
        Ok(HttpResponseParts {
            status: 200,
            headers: BTreeMap::new(),
            body: vec![1, 2, 3],
            ttfb_ms: Some(1),
        })
    }
}

fn vendor(id: &str, url: &str) -> VendorConfig {
    serde_json::from_value(json!({
        "id": id,
        "name": id,
        "template_id": "elevenlabs",
        "url": url,
        "auth_scheme": "api-key",
        "api_key": "xi-secret",
    }))
    .unwrap()
}

fn manager(store: Arc<MemoryStore>, config: JobConfig) -> JobManager {
    JobManager::new(
        config,
        store.clone() as Arc<dyn RecordStore>,
        store as Arc<dyn AssetStore>,
        Arc::new(RoutedClient),
        Arc::new(TemplateRegistry::new()),
        Arc::new(NoCost),
        Arc::new(NoOpEventSink),
    )
}

async fn wait_terminal(manager: &JobManager, job_id: Uuid) -> ProgressSnapshot {
    for _ in 0..1000 {
        let progress = manager.progress(job_id).await.unwrap();
        if progress.status.is_terminal() {
            return progress;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("job never reached a terminal status");
}

fn spec(vendor_ids: &[&str], repetitions: u32) -> JobSpec {
    JobSpec {
        vendor_ids: vendor_ids.iter().map(|s| s.to_string()).collect(),
        inputs: vec![CallInput::Text("hello".to_string())],
        repetitions,
        hints: CallHints::default(),
    }
}

#[tokio::test]
async fn one_vendor_failing_never_fails_the_batch() {
    let store = Arc::new(MemoryStore::new());
    store
        .upsert_vendor(vendor("vendor-a", "https://a.test/v1/tts"))
        .await
        .unwrap();
    store
        .upsert_vendor(vendor("vendor-b", "https://b.test/v1/tts"))
        .await
        .unwrap();
    let manager = manager(store.clone(), JobConfig::default());

    let job_id = manager
        .start_job(spec(&["vendor-a", "vendor-b"], 3))
        .await
        .unwrap();
    let progress = wait_terminal(&manager, job_id).await;

    assert_eq!(progress.status, JobStatus::Completed);
    assert_eq!(progress.total, 6);
    assert_eq!(progress.completed, 3);
    assert_eq!(progress.failed, 3);
    assert!(progress.current.is_none());

    let results = store.list_results(job_id).await.unwrap();
    assert_eq!(results.len(), 6);
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r.seq, (i + 1) as u32);
    }

    let mut a_reps: Vec<u32> = results
        .iter()
        .filter(|r| r.vendor_id == "vendor-a")
        .map(|r| r.repetition)
        .collect();
    a_reps.sort_unstable();
    assert_eq!(a_reps, vec![1, 2, 3]);

    for r in results.iter().filter(|r| r.vendor_id == "vendor-a") {
        assert_eq!(r.status, ResultStatus::Success);
        let Some(Artifact::AudioRef(reference)) = &r.artifact else {
            panic!("expected an audio reference artifact");
        };
        assert_eq!(store.retrieve(reference).await.unwrap(), vec![1, 2, 3]);
    }
    for r in results.iter().filter(|r| r.vendor_id == "vendor-b") {
        assert_eq!(r.status, ResultStatus::Failed);
        assert!(r.artifact.is_none());
        assert!(r.error.as_deref().unwrap().contains("boom"));
    }
}

#[tokio::test]
async fn bounded_concurrency_attempts_every_unit() {
    let store = Arc::new(MemoryStore::new());
    store
        .upsert_vendor(vendor("vendor-a", "https://a.test/v1/tts"))
        .await
        .unwrap();
    let manager = manager(
        store.clone(),
        JobConfig {
            unit_concurrency: 4,
            ..JobConfig::default()
        },
    );

    let job_id = manager.start_job(spec(&["vendor-a"], 8)).await.unwrap();
    let progress = wait_terminal(&manager, job_id).await;

    assert_eq!(progress.status, JobStatus::Completed);
    assert_eq!(progress.completed, 8);
    assert_eq!(progress.failed, 0);
    assert_eq!(store.list_results(job_id).await.unwrap().len(), 8);
}

#[tokio::test]
async fn unknown_vendors_fail_their_units_only() {
    let store = Arc::new(MemoryStore::new());
    store
        .upsert_vendor(vendor("vendor-a", "https://a.test/v1/tts"))
        .await
        .unwrap();
    let manager = manager(store.clone(), JobConfig::default());

    let job_id = manager
        .start_job(spec(&["vendor-a", "ghost"], 2))
        .await
        .unwrap();
    let progress = wait_terminal(&manager, job_id).await;

    assert_eq!(progress.status, JobStatus::Completed);
    assert_eq!(progress.completed, 2);
    assert_eq!(progress.failed, 2);

    let results = store.list_results(job_id).await.unwrap();
    for r in results.iter().filter(|r| r.vendor_id == "ghost") {
        assert_eq!(r.status, ResultStatus::Failed);
        assert!(r.error.as_deref().unwrap().contains("unknown vendor"));
    }
}

#[tokio::test]
async fn disabled_vendors_fail_their_units() {
    let store = Arc::new(MemoryStore::new());
    let mut v = vendor("vendor-a", "https://a.test/v1/tts");
    v.enabled = false;
    store.upsert_vendor(v).await.unwrap();
    let manager = manager(store.clone(), JobConfig::default());

    let job_id = manager.start_job(spec(&["vendor-a"], 2)).await.unwrap();
    let progress = wait_terminal(&manager, job_id).await;

    assert_eq!(progress.status, JobStatus::Completed);
    assert_eq!(progress.failed, 2);
    let results = store.list_results(job_id).await.unwrap();
    assert!(results
        .iter()
        .all(|r| r.error.as_deref().unwrap().contains("disabled")));
}

#[tokio::test]
async fn empty_specs_are_rejected_up_front() {
    let store = Arc::new(MemoryStore::new());
    let manager = manager(store, JobConfig::default());

    let err = manager.start_job(spec(&[], 1)).await.unwrap_err();
    assert!(matches!(err, JobError::InvalidSpec(_)));

    let mut no_reps = spec(&["vendor-a"], 0);
    no_reps.repetitions = 0;
    let err = manager.start_job(no_reps).await.unwrap_err();
    assert!(matches!(err, JobError::InvalidSpec(_)));
}

#[tokio::test]
async fn pausing_a_running_job_parks_it_between_units() {
    let store = Arc::new(MemoryStore::new());
    store
        .upsert_vendor(vendor("vendor-a", "https://a.test/v1/tts"))
        .await
        .unwrap();
    let manager = JobManager::new(
        JobConfig::default(),
        store.clone() as Arc<dyn RecordStore>,
        store.clone() as Arc<dyn AssetStore>,
        Arc::new(SlowClient {
            delay: Duration::from_millis(20),
        }),
        Arc::new(TemplateRegistry::new()),
        Arc::new(NoCost),
        Arc::new(NoOpEventSink),
    );

    let job_id = manager.start_job(spec(&["vendor-a"], 50)).await.unwrap();

    // Let a couple of units finish before asking for the pause.
    for _ in 0..1000 {
        let progress = manager.progress(job_id).await.unwrap();
        if progress.completed + progress.failed >= 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    manager.pause(job_id).await.unwrap();

    // The worker drains its in-flight unit, then parks.
    let mut parked = None;
    for _ in 0..1000 {
        let progress = manager.progress(job_id).await.unwrap();
        if progress.status == JobStatus::Paused && progress.current.is_none() {
            parked = Some(progress);
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let parked = parked.expect("job never parked after the pause request");
    assert!(parked.completed + parked.failed < parked.total);

    // No further units are attempted while paused.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let later = manager.progress(job_id).await.unwrap();
    assert_eq!(later.status, JobStatus::Paused);
    assert_eq!(later.completed, parked.completed);
    assert_eq!(later.failed, parked.failed);
    assert!(later.current.is_none());

    // Pausing again is a no-op.
    manager.pause(job_id).await.unwrap();
    let after = manager.progress(job_id).await.unwrap();
    assert_eq!(after.status, JobStatus::Paused);
}

#[tokio::test]
async fn pause_is_a_noop_on_terminal_jobs() {
    let store = Arc::new(MemoryStore::new());
    store
        .upsert_vendor(vendor("vendor-a", "https://a.test/v1/tts"))
        .await
        .unwrap();
    let manager = manager(store.clone(), JobConfig::default());

    let job_id = manager.start_job(spec(&["vendor-a"], 1)).await.unwrap();
    let progress = wait_terminal(&manager, job_id).await;
    assert_eq!(progress.status, JobStatus::Completed);

    manager.pause(job_id).await.unwrap();
    let after = manager.progress(job_id).await.unwrap();
    assert_eq!(after.status, JobStatus::Completed);
}

#[tokio::test]
async fn pausing_an_unknown_job_is_an_error() {
    let store = Arc::new(MemoryStore::new());
    let manager = manager(store, JobConfig::default());

    let err = manager.pause(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, JobError::UnknownJob(_)));
}
