mod common;
mod params;
mod template;
mod vendor;

pub use common::{AudioEncoding, AuthScheme, BodyFormat, ServiceKind};
pub use params::{CallHints, CallInput, CallParams};
pub use template::{ModelInfo, Template, TemplateProvenance, TemplateUpdate, VoiceInfo};
pub use vendor::{system_presets_from_env, MaskedVendorConfig, VendorConfig, VendorProvenance, VendorUpdate};
