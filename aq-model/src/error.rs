use aq_features::SchemaMismatch;
use thiserror::Error;

/// Errors from loading or evaluating a model artifact.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Artifact file could not be read
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact is not valid JSON for the expected layout
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    /// Artifact parsed but is internally inconsistent
    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    /// Feature vector does not line up with the artifact's feature list
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(#[from] SchemaMismatch),

    /// A previous initialization panicked while holding the init lock
    #[error("Model cache initialization lock is poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, ModelError>;
