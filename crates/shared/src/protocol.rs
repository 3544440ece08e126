use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    domain::Algorithm,
    error::{HighlightSet, StepError},
};

/// Body of `GET /generate?size=N`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub array: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQuery {
    pub size: usize,
}

/// Body of `POST /sort`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    pub array: Vec<u32>,
    pub algorithm: Algorithm,
}

/// One visualization frame of a sort run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortStep {
    pub array: Vec<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comparing: Vec<usize>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub swapping: Vec<usize>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sorted: Vec<usize>,
}

impl SortStep {
    /// Checks that this step describes an array of `len` elements and that
    /// every highlighted index points into it.
    pub fn check_bounds(&self, len: usize) -> Result<(), StepError> {
        if self.array.len() != len {
            return Err(StepError::LengthMismatch {
                expected: len,
                actual: self.array.len(),
            });
        }

        for (set, indices) in [
            (HighlightSet::Comparing, &self.comparing),
            (HighlightSet::Swapping, &self.swapping),
            (HighlightSet::Sorted, &self.sorted),
        ] {
            if let Some(&index) = indices.iter().find(|&&index| index >= len) {
                return Err(StepError::IndexOutOfRange { set, index, len });
            }
        }

        Ok(())
    }
}

/// Response of `POST /sort`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub steps: Vec<SortStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// Servers written against nil slices send `null` instead of `[]`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_null_and_missing_highlight_sets_as_empty() {
        let raw = r#"{"steps":[
            {"array":[2,1],"comparing":[0,1],"swapping":null,"sorted":null},
            {"array":[1,2],"swapping":[0,1]}
        ],"name":"Bubble Sort"}"#;
        let result: SortResult = serde_json::from_str(raw).expect("decode");

        assert_eq!(result.name.as_deref(), Some("Bubble Sort"));
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.steps[0].comparing, vec![0, 1]);
        assert!(result.steps[0].swapping.is_empty());
        assert!(result.steps[1].comparing.is_empty());
        assert!(result.steps[1].sorted.is_empty());
    }

    #[test]
    fn null_steps_decode_to_empty_trace() {
        let result: SortResult = serde_json::from_str(r#"{"steps":null}"#).expect("decode");
        assert!(result.steps.is_empty());
        assert!(result.name.is_none());
    }

    #[test]
    fn sort_request_uses_lowercase_algorithm_name() {
        let body = serde_json::to_value(SortRequest {
            array: vec![3, 1, 2],
            algorithm: Algorithm::Cocktail,
        })
        .expect("encode");
        assert_eq!(
            body,
            serde_json::json!({ "array": [3, 1, 2], "algorithm": "cocktail" })
        );
    }

    #[test]
    fn check_bounds_rejects_foreign_arrays_and_stray_indices() {
        let step = SortStep {
            array: vec![1, 2, 3],
            comparing: vec![0, 1],
            swapping: Vec::new(),
            sorted: vec![2],
        };
        assert_eq!(step.check_bounds(3), Ok(()));
        assert_eq!(
            step.check_bounds(4),
            Err(StepError::LengthMismatch {
                expected: 4,
                actual: 3
            })
        );

        let stray = SortStep {
            swapping: vec![1, 3],
            ..step
        };
        assert_eq!(
            stray.check_bounds(3),
            Err(StepError::IndexOutOfRange {
                set: HighlightSet::Swapping,
                index: 3,
                len: 3
            })
        );
    }
}
