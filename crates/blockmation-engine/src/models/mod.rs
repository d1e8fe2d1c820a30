pub mod block;
pub mod frame;
pub mod model;

pub use block::Block;
pub use frame::Frame;
pub use model::Model;

/// Smallest size accepted for a newly created movie
pub const MIN_NEW_DIMENSIONS: usize = 1;

/// Largest size accepted for a newly created movie
pub const MAX_NEW_DIMENSIONS: usize = 100;

/// Misuse of the frame/movie API: bad coordinates, indices or sizes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("Coordinate ({x}, {y}) is outside a {dimensions}x{dimensions} frame")]
    CoordinateOutOfRange {
        x: usize,
        y: usize,
        dimensions: usize,
    },
    #[error("Frame {index} does not exist (movie has {total_frames} frames)")]
    FrameOutOfRange { index: usize, total_frames: usize },
    #[error("Frame is {actual}x{actual} but the movie is {expected}x{expected}")]
    InvalidDimension { expected: usize, actual: usize },
    #[error(
        "Movie size {requested} is not supported (must be between {min} and {max})",
        min = MIN_NEW_DIMENSIONS,
        max = MAX_NEW_DIMENSIONS
    )]
    UnsupportedDimensions { requested: usize },
}

/// Check the size requested for a new movie
pub fn validate_new_dimensions(requested: usize) -> Result<usize, ModelError> {
    if (MIN_NEW_DIMENSIONS..=MAX_NEW_DIMENSIONS).contains(&requested) {
        Ok(requested)
    } else {
        Err(ModelError::UnsupportedDimensions { requested })
    }
}
