use std::path::PathBuf;

/// Engine-wide error type.
///
/// Content-level errors (everything except [`EngineError::Hardware`]) are
/// recoverable: the frame loop never aborts on them (see the propagation
/// policy in the engine design notes). Callers that load a single asset or
/// map abort *that* load and return the error; the caller decides whether
/// to retry, fall back to a placeholder, or skip the entity.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("operation on invalid/dead entity {0:?}")]
    InvalidEntity(crate::ecs::Entity),

    #[error("asset not found: {path}")]
    AssetNotFound { path: PathBuf },

    #[error("malformed content in {path}: {reason}")]
    MalformedContent { path: PathBuf, reason: String },

    #[error("failed to decode tile data in {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("circular tileset reference detected at {path}")]
    CircularReference { path: PathBuf },

    #[error("{path} requires schema_version {found}, but only up to {supported} is supported")]
    VersionMismatch {
        path: PathBuf,
        found: u32,
        supported: u32,
    },

    #[error("hardware error: {0}")]
    Hardware(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
