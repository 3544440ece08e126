use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

pub const MIN_ARRAY_SIZE: usize = 5;
pub const MAX_ARRAY_SIZE: usize = 50;
pub const DEFAULT_ARRAY_SIZE: usize = 20;
pub const MIN_ARRAY_VALUE: u32 = 1;
pub const MAX_ARRAY_VALUE: u32 = 100;

pub fn is_valid_array_size(size: usize) -> bool {
    (MIN_ARRAY_SIZE..=MAX_ARRAY_SIZE).contains(&size)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Bubble,
    Selection,
    Insertion,
    Quick,
    Merge,
    Heap,
    Shell,
    Cocktail,
}

impl Algorithm {
    pub const ALL: [Algorithm; 8] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Quick,
        Algorithm::Merge,
        Algorithm::Heap,
        Algorithm::Shell,
        Algorithm::Cocktail,
    ];

    /// Wire name used in `/sort` request bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Quick => "quick",
            Algorithm::Merge => "merge",
            Algorithm::Heap => "heap",
            Algorithm::Shell => "shell",
            Algorithm::Cocktail => "cocktail",
        }
    }

    pub fn details(self) -> &'static AlgorithmDetails {
        match self {
            Algorithm::Bubble => &BUBBLE,
            Algorithm::Selection => &SELECTION,
            Algorithm::Insertion => &INSERTION,
            Algorithm::Quick => &QUICK,
            Algorithm::Merge => &MERGE,
            Algorithm::Heap => &HEAP,
            Algorithm::Shell => &SHELL,
            Algorithm::Cocktail => &COCKTAIL,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sorting algorithm '{0}'")]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownAlgorithm(value.to_string()))
    }
}

/// Catalog entry shown next to the visualization for the selected algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlgorithmDetails {
    pub name: &'static str,
    pub description: &'static str,
    pub best_case: &'static str,
    pub average_case: &'static str,
    pub worst_case: &'static str,
    pub space: &'static str,
}

static BUBBLE: AlgorithmDetails = AlgorithmDetails {
    name: "Bubble Sort",
    description: "A simple comparison sort. It repeatedly steps through the list, compares adjacent elements and swaps them if they are in the wrong order.",
    best_case: "O(n)",
    average_case: "O(n^2)",
    worst_case: "O(n^2)",
    space: "O(1)",
};

static SELECTION: AlgorithmDetails = AlgorithmDetails {
    name: "Selection Sort",
    description: "An in-place comparison sort. It splits the list into a sorted prefix built up from left to right and an unsorted remainder, repeatedly moving the smallest remaining item to the end of the prefix.",
    best_case: "O(n^2)",
    average_case: "O(n^2)",
    worst_case: "O(n^2)",
    space: "O(1)",
};

static INSERTION: AlgorithmDetails = AlgorithmDetails {
    name: "Insertion Sort",
    description: "Builds the final sorted array one item at a time, shifting each new item left until it sits in order. Much slower than the divide-and-conquer sorts on large lists.",
    best_case: "O(n)",
    average_case: "O(n^2)",
    worst_case: "O(n^2)",
    space: "O(1)",
};

static QUICK: AlgorithmDetails = AlgorithmDetails {
    name: "Quick Sort",
    description: "A divide-and-conquer sort. It picks a pivot and partitions the other elements into those smaller and those larger than the pivot, then sorts both partitions recursively.",
    best_case: "O(n log n)",
    average_case: "O(n log n)",
    worst_case: "O(n^2)",
    space: "O(log n)",
};

static MERGE: AlgorithmDetails = AlgorithmDetails {
    name: "Merge Sort",
    description: "A divide-and-conquer sort. It splits the list in halves, sorts each half, then merges the two sorted halves back together.",
    best_case: "O(n log n)",
    average_case: "O(n log n)",
    worst_case: "O(n log n)",
    space: "O(n)",
};

static HEAP: AlgorithmDetails = AlgorithmDetails {
    name: "Heap Sort",
    description: "Arranges the list into a binary max-heap, then repeatedly swaps the root to the end of the unsorted region and restores the heap.",
    best_case: "O(n log n)",
    average_case: "O(n log n)",
    worst_case: "O(n log n)",
    space: "O(1)",
};

static SHELL: AlgorithmDetails = AlgorithmDetails {
    name: "Shell Sort",
    description: "A generalization of insertion sort that first sorts elements far apart and shrinks the gap until a final gap of one finishes the job.",
    best_case: "O(n log n)",
    average_case: "O(n^(4/3))",
    worst_case: "O(n^2)",
    space: "O(1)",
};

static COCKTAIL: AlgorithmDetails = AlgorithmDetails {
    name: "Cocktail Shaker Sort",
    description: "A bidirectional bubble sort. Each pass bubbles the largest item to the right end and then the smallest item to the left end.",
    best_case: "O(n)",
    average_case: "O(n^2)",
    worst_case: "O(n^2)",
    space: "O(1)",
};

/// Playback speed in `1..=10`; higher is faster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Speed(u8);

impl Speed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Clamps out-of-range values to the nearest bound.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Delay between two animation frames: `1100 - speed * 100` ms.
    pub fn step_delay(self) -> Duration {
        Duration::from_millis(1100 - u64::from(self.0) * 100)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(5)
    }
}

impl From<u8> for Speed {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Speed> for u8 {
    fn from(value: Speed) -> Self {
        value.0
    }
}
