//! Node execution surface consumed by the workflow runner

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::branch::{evaluate_if, evaluate_switch, IfConfig, SwitchConfig};
use super::set_value::{apply_set_value, SetValueConfig};
use crate::domain::envelope::Envelope;

/// Configuration of a single decision/enrichment node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeConfig {
    /// Boolean branch over a list of rules
    If(IfConfig),

    /// First-match branch over a list of cases
    Switch(SwitchConfig),

    /// Metadata assignments
    SetValue(SetValueConfig),

    /// Document entry point; passes the envelope through
    ManualUpload,
}

impl NodeConfig {
    /// Get a human-readable type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::If(_) => "if",
            Self::Switch(_) => "switch",
            Self::SetValue(_) => "set_value",
            Self::ManualUpload => "manual_upload",
        }
    }
}

/// Result of executing a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOutcome {
    /// Output branch for routing nodes (IF/SWITCH)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    pub envelope: Envelope,
}

impl NodeOutcome {
    fn routed(branch: impl Into<String>, envelope: Envelope) -> Self {
        Self {
            branch: Some(branch.into()),
            envelope,
        }
    }

    fn passthrough(envelope: Envelope) -> Self {
        Self {
            branch: None,
            envelope,
        }
    }
}

/// Execute an IF node; the envelope is returned unchanged
pub fn execute_if(envelope: Envelope, config: &IfConfig) -> NodeOutcome {
    let branch = evaluate_if(&envelope.metadata, config);
    debug!(
        rules = config.rules.len(),
        logic = ?config.logic,
        branch,
        "Evaluated IF node"
    );
    NodeOutcome::routed(branch, envelope)
}

/// Execute a SWITCH node; the envelope is returned unchanged
pub fn execute_switch(envelope: Envelope, config: &SwitchConfig) -> NodeOutcome {
    let branch = evaluate_switch(&envelope.metadata, config).to_string();
    debug!(cases = config.cases.len(), branch = %branch, "Evaluated SWITCH node");
    NodeOutcome::routed(branch, envelope)
}

/// Execute a SET-VALUE node; the document reference passes through
pub fn execute_set_value(envelope: Envelope, config: &SetValueConfig) -> NodeOutcome {
    let metadata = apply_set_value(&envelope.metadata, config);
    debug!(
        assignments = config.assignments.len(),
        "Applied SET-VALUE node"
    );
    NodeOutcome::passthrough(envelope.with_metadata(metadata))
}

/// Execute a MANUAL-UPLOAD node (identity)
pub fn execute_manual_upload(envelope: Envelope) -> NodeOutcome {
    NodeOutcome::passthrough(envelope)
}

/// Execute any node configuration
pub fn execute_node(envelope: Envelope, config: &NodeConfig) -> NodeOutcome {
    match config {
        NodeConfig::If(if_config) => execute_if(envelope, if_config),
        NodeConfig::Switch(switch_config) => execute_switch(envelope, switch_config),
        NodeConfig::SetValue(set_config) => execute_set_value(envelope, set_config),
        NodeConfig::ManualUpload => execute_manual_upload(envelope),
    }
}
