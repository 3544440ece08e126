//! Observer stream published by the playback controller.

use shared::domain::Algorithm;

use crate::error::{Operation, PlaybackError};

/// Visible state after applying one trace step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub step: usize,
    pub array: Vec<u32>,
    pub highlights: Highlights,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlights {
    pub comparing: Vec<usize>,
    pub swapping: Vec<usize>,
    pub sorted: Vec<usize>,
}

impl Highlights {
    pub fn is_empty(&self) -> bool {
        self.comparing.is_empty() && self.swapping.is_empty() && self.sorted.is_empty()
    }

    pub fn clear(&mut self) {
        self.comparing.clear();
        self.swapping.clear();
        self.sorted.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    AlgorithmChanged {
        algorithm: Algorithm,
    },
    ArrayReplaced {
        len: usize,
    },
    ArrayCleared,
    TraceLoaded {
        algorithm: Algorithm,
        steps: usize,
        name: Option<String>,
    },
    Frame(Frame),
    Paused {
        at: usize,
    },
    Finished {
        sorted: Vec<usize>,
    },
    OperationFailed {
        operation: Operation,
        error: PlaybackError,
    },
}
