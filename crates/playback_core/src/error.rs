use shared::{
    domain::{MAX_ARRAY_SIZE, MIN_ARRAY_SIZE},
    error::StepError,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error(
        "array size {size} is outside {min}..={max}",
        min = MIN_ARRAY_SIZE,
        max = MAX_ARRAY_SIZE
    )]
    InvalidArraySize { size: usize },
    #[error("no array loaded")]
    EmptyArray,
    #[error("array source failed: {0}")]
    ArraySource(String),
    #[error("sort trace request failed: {0}")]
    TraceRequest(String),
    #[error("sort trace contained no steps")]
    EmptyTrace,
    #[error("sort trace step {step} is malformed: {source}")]
    MalformedTrace { step: usize, source: StepError },
    #[error("superseded by a newer reset")]
    Superseded,
}

/// Controller operation a published failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Regenerate,
    RequestTrace,
    StartPlayback,
}
