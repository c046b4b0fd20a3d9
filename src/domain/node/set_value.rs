//! SET-VALUE metadata assignments

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::condition::set_path;

/// Assign `value` at `field_path`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(default)]
    pub field_path: String,

    #[serde(default)]
    pub value: Value,
}

impl Assignment {
    pub fn new(field_path: impl Into<String>, value: Value) -> Self {
        Self {
            field_path: field_path.into(),
            value,
        }
    }
}

/// SET-VALUE node configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SetValueConfig {
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl SetValueConfig {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    pub fn with_assignment(mut self, field_path: impl Into<String>, value: Value) -> Self {
        self.assignments.push(Assignment::new(field_path, value));
        self
    }
}

/// Apply assignments to a structural copy of `metadata`
///
/// The input is left untouched and shares nothing with the result.
/// Assignments run in order, so a later assignment to the same path wins;
/// assignments without a field path are skipped.
pub fn apply_set_value(metadata: &Map<String, Value>, config: &SetValueConfig) -> Map<String, Value> {
    let mut updated = metadata.clone();

    for assignment in &config.assignments {
        if assignment.field_path.is_empty() {
            continue;
        }

        set_path(&mut updated, &assignment.field_path, assignment.value.clone());
    }

    updated
}
