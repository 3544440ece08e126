use thiserror::Error;

/// Reason a [`SortStep`](crate::protocol::SortStep) cannot be painted against
/// the array it claims to describe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("step array has {actual} elements, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("{set} index {index} is out of range for {len} elements")]
    IndexOutOfRange {
        set: HighlightSet,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightSet {
    Comparing,
    Swapping,
    Sorted,
}

impl std::fmt::Display for HighlightSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            HighlightSet::Comparing => "comparing",
            HighlightSet::Swapping => "swapping",
            HighlightSet::Sorted => "sorted",
        })
    }
}
