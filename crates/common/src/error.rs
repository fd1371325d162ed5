use crate::types::ShapeKind;

/// Errors raised by the core math, body and world operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// A value of the wrong shape or range crossed an API boundary.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// No narrow-phase test exists for this shape combination.
    /// Distinct from "no collision".
    #[error("unsupported collision pair: {a:?} vs {b:?}")]
    UnsupportedCollisionPair { a: ShapeKind, b: ShapeKind },
    /// Lookup or removal on a stale, removed or never-issued handle.
    #[error("index not found: {0}")]
    IndexNotFound(String),
}

/// Errors from loading or validating an [`crate::EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown config format for {0:?} (expected .yaml, .yml or .json)")]
    UnknownFormat(std::path::PathBuf),
    #[error("invalid config: {0}")]
    Invalid(#[from] CoreError),
}
