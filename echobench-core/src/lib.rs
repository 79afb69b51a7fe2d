#![forbid(unsafe_code)]

pub mod error;
pub mod extract;
pub mod registry;
pub mod render;
pub mod types;

pub use crate::error::RegistryError;
pub use crate::extract::extract;
pub use crate::registry::TemplateRegistry;
pub use crate::render::{render, render_plain, VarMap};
pub use crate::types::{
    AudioEncoding, AuthScheme, BodyFormat, CallHints, CallInput, CallParams, ModelInfo,
    ServiceKind, Template, TemplateProvenance, TemplateUpdate, VendorConfig, VendorProvenance,
    VendorUpdate, VoiceInfo,
};
