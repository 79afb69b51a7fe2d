pub mod audio;
pub mod call;
pub mod concurrency;
pub mod events;
pub mod http;
pub mod job;
pub mod request;

pub use audio::{decode_from_response, decode_inline, encode_inline};
pub use call::{execute_call, CallArtifact, CallError, CallSuccess};
pub use events::{EventSink, JobEvent, NoOpEventSink, TracingEventSink};
pub use http::{
    HttpClient, HttpError, HttpRequestParts, HttpResponseParts, MultipartField, MultipartValue,
    ReqwestHttpClient, RequestBody,
};
pub use job::{JobConfig, JobError, JobManager, JobSpec, ProgressSnapshot};
pub use request::build_request;
