use thiserror::Error;

/// Error taxonomy shared by the core and the frontend surfaces.
///
/// `RasterizationFailed` is the only variant a user ever sees; the rest are
/// defensive and handled as a logged warning plus no-op where they occur.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The source document could not be decoded or rendered. Recoverable:
    /// the caller falls back to a cached preview image when one exists.
    #[error("document could not be rasterized: {0}")]
    RasterizationFailed(String),

    /// A pixel-to-percent conversion was asked against a degenerate
    /// container. Programming error, not a user-facing condition.
    #[error("invalid container geometry: {width}x{height}")]
    InvalidGeometry { width: f64, height: f64 },

    /// A field with this id is already in the store.
    #[error("field id already exists: {0}")]
    DuplicateId(String),

    /// No field with this id is in the store.
    #[error("no field with id: {0}")]
    NotFound(String),
}
