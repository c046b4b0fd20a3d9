//! Workflow node domain module
//!
//! Decision and enrichment nodes operating on an [`Envelope`]:
//! - IF: combine rules with AND/OR into a `"true"`/`"false"` branch
//! - SWITCH: first matching case id, or `"fallback"`
//! - SET-VALUE: path assignments on a copy of the metadata
//! - MANUAL-UPLOAD: identity
//!
//! [`Envelope`]: crate::domain::envelope::Envelope

mod branch;
mod executor;
mod set_value;
mod validation;

pub use branch::{
    evaluate_if, evaluate_switch, BranchLogic, IfConfig, SwitchCase, SwitchConfig, BRANCH_FALSE,
    BRANCH_TRUE, FALLBACK_BRANCH,
};
pub use executor::{
    execute_if, execute_manual_upload, execute_node, execute_set_value, execute_switch,
    NodeConfig, NodeOutcome,
};
pub use set_value::{apply_set_value, Assignment, SetValueConfig};
pub use validation::{validate_node_config, validate_rule, NodeValidationError};
