#![forbid(unsafe_code)]

//! Call execution and batch orchestration for echobench.
//!
//! The declarative side (templates, rendering, extraction) lives in
//! `echobench-core`; this crate turns a template plus a vendor configuration
//! into real HTTP calls and drives batches of them.

pub mod cost;
pub mod executor;
pub mod remote;

pub use crate::cost::{CostModel, FlatRate, NoCost};
pub use crate::executor::{
    build_request, decode_from_response, encode_inline, execute_call, CallError, CallSuccess,
    EventSink, HttpClient, HttpError, HttpRequestParts, HttpResponseParts, JobConfig, JobError,
    JobEvent, JobManager, JobSpec, ProgressSnapshot, ReqwestHttpClient, RequestBody,
};
pub use crate::remote::{load_remote_templates, RemoteError};
