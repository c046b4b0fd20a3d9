//! Node configuration validation
//!
//! Evaluation never rejects a configuration; rules the evaluator cannot honour
//! simply resolve to `false`. These checks let authoring tools flag such
//! configurations before they are deployed.

use std::collections::HashSet;

use thiserror::Error;

use super::executor::NodeConfig;
use crate::domain::condition::{ConditionOperator, ConditionRule, DataType};

/// Problems found in a node configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NodeValidationError {
    #[error("Rule field path cannot be empty")]
    EmptyFieldPath,

    #[error("Data type of rule on '{0}' is not recognised")]
    UnknownDataType(String),

    #[error("Operator of rule on '{0}' is not recognised")]
    UnknownOperator(String),

    #[error("Operator {operator:?} is not supported for {data_type:?} rule on '{field_path}'")]
    UnsupportedOperator {
        field_path: String,
        data_type: DataType,
        operator: ConditionOperator,
    },

    #[error("Operator {operator:?} on '{field_path}' requires a value")]
    MissingValue {
        field_path: String,
        operator: ConditionOperator,
    },

    #[error("Switch case id cannot be empty")]
    EmptyCaseId,

    #[error("Duplicate switch case id '{0}'")]
    DuplicateCaseId(String),

    #[error("Assignment {0} has an empty field path")]
    EmptyAssignmentPath(usize),
}

/// Validate a single rule
pub fn validate_rule(rule: &ConditionRule) -> Result<(), NodeValidationError> {
    if rule.field_path.is_empty() {
        return Err(NodeValidationError::EmptyFieldPath);
    }

    if rule.operator == ConditionOperator::Unknown {
        return Err(NodeValidationError::UnknownOperator(rule.field_path.clone()));
    }

    if rule.data_type == DataType::Unknown && !rule.data_type.supports(rule.operator) {
        return Err(NodeValidationError::UnknownDataType(rule.field_path.clone()));
    }

    if !rule.data_type.supports(rule.operator) {
        return Err(NodeValidationError::UnsupportedOperator {
            field_path: rule.field_path.clone(),
            data_type: rule.data_type,
            operator: rule.operator,
        });
    }

    if rule.operator.needs_value() && rule.value.is_none() {
        return Err(NodeValidationError::MissingValue {
            field_path: rule.field_path.clone(),
            operator: rule.operator,
        });
    }

    Ok(())
}

/// Validate a node configuration, collecting every problem found
pub fn validate_node_config(config: &NodeConfig) -> Vec<NodeValidationError> {
    let mut errors = Vec::new();

    match config {
        NodeConfig::If(if_config) => {
            errors.extend(if_config.rules.iter().filter_map(|r| validate_rule(r).err()));
        }
        NodeConfig::Switch(switch_config) => {
            let mut seen = HashSet::new();

            for case in &switch_config.cases {
                if case.id.is_empty() {
                    errors.push(NodeValidationError::EmptyCaseId);
                } else if !seen.insert(case.id.as_str()) {
                    errors.push(NodeValidationError::DuplicateCaseId(case.id.clone()));
                }

                if let Err(e) = validate_rule(&case.rule) {
                    errors.push(e);
                }
            }
        }
        NodeConfig::SetValue(set_config) => {
            errors.extend(
                set_config
                    .assignments
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| a.field_path.is_empty())
                    .map(|(idx, _)| NodeValidationError::EmptyAssignmentPath(idx)),
            );
        }
        NodeConfig::ManualUpload => {}
    }

    errors
}
