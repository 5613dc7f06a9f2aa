use std::path::PathBuf;

/// Alias for `Result<T, StageError>`.
pub type StageResult<T> = Result<T, StageError>;

/// Errors raised by stage services.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// The asset name is not in the catalog.
    #[error("unknown asset: {0}")]
    UnknownAsset(String),

    /// No live model is registered under this entity name.
    #[error("no loaded model named \"{0}\"")]
    MissingModel(String),

    /// The model exists but has no such animation clip.
    #[error("model \"{entity}\" has no clip \"{clip}\"")]
    UnknownClip {
        /// Entity name.
        entity: String,
        /// Requested clip.
        clip: String,
    },

    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    ConfigIo {
        /// Offending file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration could not be parsed.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Scene tree error.
    #[error(transparent)]
    Tree(#[from] fable_core::CoreError),
}
