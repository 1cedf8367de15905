use thiserror::Error;

/// Failures detected while building a scene
///
/// Only construction can fail; every buffer a running scene touches is
/// bounded by the strand capacity chosen at compile time.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    #[error("strand has no pixels")]
    EmptyStrand,
    #[error("strand of {requested} pixels exceeds capacity of {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },
}

pub type SceneResult<T> = Result<T, SceneError>;
