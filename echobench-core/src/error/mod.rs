use thiserror::Error;

/// Errors surfaced synchronously to callers of registry and vendor-config
/// mutations. These are never swallowed into job results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("id '{0}' conflicts with an existing template")]
    Conflict(String),
    #[error("'{0}' is not editable")]
    NotEditable(String),
    #[error("no template with id '{0}'")]
    NotFound(String),
}
