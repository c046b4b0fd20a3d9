//! IF and SWITCH branch routing

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::condition::ConditionRule;

/// Branch label taken by an IF node whose rules hold
pub const BRANCH_TRUE: &str = "true";

/// Branch label taken by an IF node whose rules do not hold
pub const BRANCH_FALSE: &str = "false";

/// Branch label taken by a SWITCH node when no case matches
pub const FALLBACK_BRANCH: &str = "fallback";

/// How the rules of an IF node are combined
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BranchLogic {
    #[default]
    #[serde(rename = "AND")]
    And,

    #[serde(rename = "OR")]
    Or,

    /// Any other value; combined like AND
    #[serde(other)]
    Unrecognized,
}

/// IF node configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IfConfig {
    #[serde(default)]
    pub logic: BranchLogic,

    #[serde(default)]
    pub rules: Vec<ConditionRule>,
}

impl IfConfig {
    pub fn new(logic: BranchLogic) -> Self {
        Self {
            logic,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: ConditionRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Combine the rules; an IF node without rules never holds
    pub fn evaluate(&self, metadata: &Map<String, Value>) -> bool {
        if self.rules.is_empty() {
            return false;
        }

        match self.logic {
            BranchLogic::Or => self.rules.iter().any(|rule| rule.evaluate(metadata)),
            BranchLogic::And | BranchLogic::Unrecognized => {
                self.rules.iter().all(|rule| rule.evaluate(metadata))
            }
        }
    }
}

/// A single SWITCH case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub id: String,
    pub rule: ConditionRule,
}

impl SwitchCase {
    pub fn new(id: impl Into<String>, rule: ConditionRule) -> Self {
        Self {
            id: id.into(),
            rule,
        }
    }
}

/// SWITCH node configuration; cases are tried in order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwitchConfig {
    #[serde(default)]
    pub cases: Vec<SwitchCase>,
}

impl SwitchConfig {
    pub fn new(cases: Vec<SwitchCase>) -> Self {
        Self { cases }
    }

    pub fn add_case(mut self, case: SwitchCase) -> Self {
        self.cases.push(case);
        self
    }
}

/// Evaluate an IF node, returning `"true"` or `"false"`
pub fn evaluate_if(metadata: &Map<String, Value>, config: &IfConfig) -> &'static str {
    if config.evaluate(metadata) {
        BRANCH_TRUE
    } else {
        BRANCH_FALSE
    }
}

/// Evaluate a SWITCH node, returning the first matching case id or `"fallback"`
pub fn evaluate_switch<'a>(metadata: &Map<String, Value>, config: &'a SwitchConfig) -> &'a str {
    config
        .cases
        .iter()
        .find(|case| case.rule.evaluate(metadata))
        .map(|case| case.id.as_str())
        .unwrap_or(FALLBACK_BRANCH)
}
