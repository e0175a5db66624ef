//! Error types for the annotaria library.

use thiserror::Error;

/// Result type for annotaria operations.
pub type Result<T> = std::result::Result<T, AnnotariaError>;

/// Error types that can occur while loading, interpolating or converting datasets.
#[derive(Error, Debug)]
pub enum AnnotariaError {
    /// Error during JSON parsing or serialization.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid annotation data.
    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),

    /// Invalid bounding box coordinates.
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    /// Empty dataset provided.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Frame positions that must be strictly increasing are not.
    #[error("Non-monotonic positions: {0}")]
    NonMonotonicPositions(String),

    /// An annotation references a category that does not exist.
    #[error("Unknown category: {0}")]
    UnknownCategory(u64),

    /// An annotation references an image that does not exist.
    #[error("Unknown image: {0}")]
    UnknownImage(String),

    /// Configuration rejected at load time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An image header could not be read.
    #[error("Image error: {0}")]
    ImageError(String),

    /// A track has too few keyframes to define an interval.
    ///
    /// The interpolation driver recovers from this locally; it is never
    /// surfaced from [`crate::interpolation::interpolate_dataset`].
    #[error("Track {track_id} has {keyframes} keyframe(s), at least 2 are required")]
    DegenerateTrack { track_id: u64, keyframes: usize },
}

impl From<image::ImageError> for AnnotariaError {
    fn from(err: image::ImageError) -> Self {
        AnnotariaError::ImageError(err.to_string())
    }
}
