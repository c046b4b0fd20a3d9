//! Typed condition rules and their evaluation

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::coerce::{is_truthy, to_epoch_millis, to_number, to_text};
use super::path::get_path;

/// Data type a rule compares its operands as
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Datetime,
    Boolean,

    /// Unrecognised or missing data type; only `exists`/`not_exists` can match
    #[default]
    #[serde(other)]
    Unknown,
}

/// Condition comparison operators
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    /// Field is present and not null
    Exists,

    /// Field is absent or null
    NotExists,

    Equals,
    NotEquals,

    /// Substring test (string rules)
    Contains,

    /// Negated substring test (string rules)
    NotContains,

    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,

    /// Field is truthy (boolean rules)
    IsTrue,

    /// Field is falsy (boolean rules)
    IsFalse,

    /// Unrecognised or missing operator; never matches
    #[default]
    #[serde(other)]
    Unknown,
}

impl ConditionOperator {
    /// Whether the operator compares against `rule.value`
    pub fn needs_value(&self) -> bool {
        !matches!(
            self,
            Self::Exists | Self::NotExists | Self::IsTrue | Self::IsFalse | Self::Unknown
        )
    }
}

impl DataType {
    /// Operators the evaluator honours for this data type
    ///
    /// `exists` and `not_exists` are type-independent and always supported.
    pub fn supports(&self, operator: ConditionOperator) -> bool {
        use ConditionOperator::*;

        if matches!(operator, Exists | NotExists) {
            return true;
        }

        match self {
            Self::String => matches!(operator, Equals | NotEquals | Contains | NotContains),
            Self::Number | Self::Datetime => matches!(
                operator,
                Equals | NotEquals | GreaterThan | LessThan | GreaterOrEqual | LessOrEqual
            ),
            Self::Boolean => matches!(operator, IsTrue | IsFalse),
            Self::Unknown => false,
        }
    }
}

/// A single typed comparison against a metadata field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRule {
    /// Dot-separated path into the metadata
    #[serde(default)]
    pub field_path: String,

    #[serde(default)]
    pub data_type: DataType,

    #[serde(default)]
    pub operator: ConditionOperator,

    /// Comparison operand; `None` when absent, `Some(Null)` for an explicit null
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Value>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ConditionRule {
    pub fn new(
        field_path: impl Into<String>,
        data_type: DataType,
        operator: ConditionOperator,
    ) -> Self {
        Self {
            field_path: field_path.into(),
            data_type,
            operator,
            value: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Evaluate the rule against a metadata record
    ///
    /// Never fails: operands that cannot be coerced, and operator/data type
    /// pairs the data type does not support, evaluate to `false`.
    pub fn evaluate(&self, metadata: &Map<String, Value>) -> bool {
        let actual = get_path(metadata, &self.field_path);
        let expected = self.value.as_ref();

        match self.operator {
            ConditionOperator::Exists => return is_present(actual),
            ConditionOperator::NotExists => return !is_present(actual),
            _ => {}
        }

        match self.data_type {
            DataType::String => compare_text(self.operator, actual, expected),
            DataType::Number => compare_ordered(self.operator, to_number(actual), to_number(expected)),
            DataType::Datetime => compare_ordered(
                self.operator,
                to_epoch_millis(actual),
                to_epoch_millis(expected),
            ),
            DataType::Boolean => match self.operator {
                ConditionOperator::IsTrue => is_truthy(actual),
                ConditionOperator::IsFalse => !is_truthy(actual),
                _ => false,
            },
            DataType::Unknown => false,
        }
    }
}

fn is_present(value: Option<&Value>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

fn compare_text(operator: ConditionOperator, actual: Option<&Value>, expected: Option<&Value>) -> bool {
    let actual = to_text(actual);
    let expected = to_text(expected);

    match operator {
        ConditionOperator::Equals => actual == expected,
        ConditionOperator::NotEquals => actual != expected,
        ConditionOperator::Contains => actual.contains(&expected),
        ConditionOperator::NotContains => !actual.contains(&expected),
        _ => false,
    }
}

fn compare_ordered(operator: ConditionOperator, actual: f64, expected: f64) -> bool {
    if actual.is_nan() || expected.is_nan() {
        return false;
    }

    match operator {
        ConditionOperator::Equals => actual == expected,
        ConditionOperator::NotEquals => actual != expected,
        ConditionOperator::GreaterThan => actual > expected,
        ConditionOperator::LessThan => actual < expected,
        ConditionOperator::GreaterOrEqual => actual >= expected,
        ConditionOperator::LessOrEqual => actual <= expected,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(obj) => obj,
            other => panic!("expected object, got {other}"),
        }
    }

    fn rule(path: &str, data_type: DataType, operator: ConditionOperator) -> ConditionRule {
        ConditionRule::new(path, data_type, operator)
    }

    #[test]
    fn test_exists_and_not_exists() {
        let m = meta(json!({"vendor": "Acme", "approver": null}));

        assert!(rule("vendor", DataType::String, ConditionOperator::Exists).evaluate(&m));
        assert!(!rule("approver", DataType::String, ConditionOperator::Exists).evaluate(&m));
        assert!(!rule("missing", DataType::Number, ConditionOperator::Exists).evaluate(&m));
        assert!(rule("approver", DataType::Boolean, ConditionOperator::NotExists).evaluate(&m));
        assert!(rule("missing.deep", DataType::Datetime, ConditionOperator::NotExists).evaluate(&m));
        assert!(!rule("", DataType::String, ConditionOperator::Exists).evaluate(&m));
    }

    #[test]
    fn test_string_operators() {
        let m = meta(json!({"vendorName": "Acme Corp", "code": 42}));

        let contains = rule("vendorName", DataType::String, ConditionOperator::Contains)
            .with_value(json!("Acme"));
        assert!(contains.evaluate(&m));

        let not_contains = rule("vendorName", DataType::String, ConditionOperator::NotContains)
            .with_value(json!("Contoso"));
        assert!(not_contains.evaluate(&m));

        let equals = rule("code", DataType::String, ConditionOperator::Equals)
            .with_value(json!("42"));
        assert!(equals.evaluate(&m));

        let not_equals = rule("vendorName", DataType::String, ConditionOperator::NotEquals)
            .with_value(json!("Acme Corp"));
        assert!(!not_equals.evaluate(&m));
    }

    #[test]
    fn test_string_missing_field_coerces_to_empty() {
        let m = meta(json!({}));

        let equals_empty = rule("vendorName", DataType::String, ConditionOperator::Equals)
            .with_value(json!(""));
        assert!(equals_empty.evaluate(&m));

        // Every string contains the empty string
        let contains_absent = rule("vendorName", DataType::String, ConditionOperator::Contains);
        assert!(contains_absent.evaluate(&m));
    }

    #[test]
    fn test_number_operators() {
        let m = meta(json!({"totalAmount": 60, "tax": "12.5"}));

        let cases = [
            (ConditionOperator::Equals, json!(60), true),
            (ConditionOperator::NotEquals, json!(60), false),
            (ConditionOperator::GreaterThan, json!(50), true),
            (ConditionOperator::LessThan, json!(100), true),
            (ConditionOperator::GreaterOrEqual, json!(60), true),
            (ConditionOperator::LessOrEqual, json!("59"), false),
        ];

        for (operator, value, expected) in cases {
            let r = rule("totalAmount", DataType::Number, operator).with_value(value);
            assert_eq!(r.evaluate(&m), expected, "operator {:?}", operator);
        }

        let tax = rule("tax", DataType::Number, ConditionOperator::GreaterThan).with_value(json!(12));
        assert!(tax.evaluate(&m));
    }

    #[test]
    fn test_number_non_numeric_operands_are_false() {
        let m = meta(json!({"totalAmount": "n/a", "amount": 10}));

        for operator in [
            ConditionOperator::Equals,
            ConditionOperator::NotEquals,
            ConditionOperator::GreaterThan,
            ConditionOperator::LessThan,
            ConditionOperator::GreaterOrEqual,
            ConditionOperator::LessOrEqual,
        ] {
            let bad_actual = rule("totalAmount", DataType::Number, operator).with_value(json!(5));
            assert!(!bad_actual.evaluate(&m));

            let bad_expected = rule("amount", DataType::Number, operator).with_value(json!("abc"));
            assert!(!bad_expected.evaluate(&m));

            let missing_actual = rule("nope", DataType::Number, operator).with_value(json!(5));
            assert!(!missing_actual.evaluate(&m));
        }
    }

    #[test]
    fn test_number_null_value_coerces_to_zero() {
        let m = meta(json!({"balance": 5}));

        let r = rule("balance", DataType::Number, ConditionOperator::GreaterThan)
            .with_value(Value::Null);
        assert!(r.evaluate(&m));

        let absent = rule("balance", DataType::Number, ConditionOperator::GreaterThan);
        assert!(!absent.evaluate(&m));
    }

    #[test]
    fn test_datetime_operators() {
        let m = meta(json!({"dueDate": "2024-03-15", "issuedAt": "2024-03-01T10:00:00Z"}));

        let before = rule("dueDate", DataType::Datetime, ConditionOperator::LessThan)
            .with_value(json!("2024-04-01"));
        assert!(before.evaluate(&m));

        let after = rule("issuedAt", DataType::Datetime, ConditionOperator::GreaterOrEqual)
            .with_value(json!("2024-03-01T09:00:00+00:00"));
        assert!(after.evaluate(&m));

        let equal = rule("dueDate", DataType::Datetime, ConditionOperator::Equals)
            .with_value(json!("2024-03-15T00:00:00Z"));
        assert!(equal.evaluate(&m));

        let invalid = rule("dueDate", DataType::Datetime, ConditionOperator::NotEquals)
            .with_value(json!("someday"));
        assert!(!invalid.evaluate(&m));
    }

    #[test]
    fn test_boolean_operators() {
        let m = meta(json!({"approved": false, "flagged": "yes", "count": 0}));

        assert!(rule("approved", DataType::Boolean, ConditionOperator::IsFalse).evaluate(&m));
        assert!(!rule("approved", DataType::Boolean, ConditionOperator::IsTrue).evaluate(&m));
        assert!(rule("flagged", DataType::Boolean, ConditionOperator::IsTrue).evaluate(&m));
        assert!(rule("count", DataType::Boolean, ConditionOperator::IsFalse).evaluate(&m));
        assert!(rule("missing", DataType::Boolean, ConditionOperator::IsFalse).evaluate(&m));
    }

    #[test]
    fn test_unsupported_combinations_are_false() {
        let m = meta(json!({"total": 100, "name": "Acme", "approved": true}));

        let contains_number = rule("total", DataType::Number, ConditionOperator::Contains)
            .with_value(json!(1));
        assert!(!contains_number.evaluate(&m));

        let greater_string = rule("name", DataType::String, ConditionOperator::GreaterThan)
            .with_value(json!("A"));
        assert!(!greater_string.evaluate(&m));

        let equals_boolean = rule("approved", DataType::Boolean, ConditionOperator::Equals)
            .with_value(json!(true));
        assert!(!equals_boolean.evaluate(&m));

        let is_true_string = rule("name", DataType::String, ConditionOperator::IsTrue);
        assert!(!is_true_string.evaluate(&m));
    }

    #[test]
    fn test_unknown_operator_and_type_deserialize_and_evaluate_false() {
        let m = meta(json!({"name": "Acme"}));

        let r: ConditionRule = serde_json::from_value(json!({
            "fieldPath": "name",
            "dataType": "string",
            "operator": "starts_with",
            "value": "A"
        }))
        .unwrap();
        assert_eq!(r.operator, ConditionOperator::Unknown);
        assert!(!r.evaluate(&m));

        let r: ConditionRule = serde_json::from_value(json!({
            "fieldPath": "name",
            "dataType": "currency",
            "operator": "equals",
            "value": "Acme"
        }))
        .unwrap();
        assert_eq!(r.data_type, DataType::Unknown);
        assert!(!r.evaluate(&m));
    }

    #[test]
    fn test_rule_value_absent_vs_null() {
        let absent: ConditionRule = serde_json::from_value(json!({
            "fieldPath": "a", "dataType": "number", "operator": "equals"
        }))
        .unwrap();
        assert_eq!(absent.value, None);

        let null: ConditionRule = serde_json::from_value(json!({
            "fieldPath": "a", "dataType": "number", "operator": "equals", "value": null
        }))
        .unwrap();
        assert_eq!(null.value, Some(Value::Null));
    }

    #[test]
    fn test_rule_without_data_type_or_operator() {
        let m = meta(json!({"vendorName": "Acme"}));

        let exists: ConditionRule = serde_json::from_value(json!({
            "fieldPath": "vendorName", "operator": "exists"
        }))
        .unwrap();
        assert_eq!(exists.data_type, DataType::Unknown);
        assert!(exists.evaluate(&m));

        let no_operator: ConditionRule = serde_json::from_value(json!({
            "fieldPath": "vendorName", "dataType": "string", "value": "Acme"
        }))
        .unwrap();
        assert_eq!(no_operator.operator, ConditionOperator::Unknown);
        assert!(!no_operator.evaluate(&m));

        let bare: ConditionRule = serde_json::from_value(json!({ "fieldPath": "vendorName" })).unwrap();
        assert!(!bare.evaluate(&m));
    }

    #[test]
    fn test_datetime_null_field_is_epoch() {
        let m = meta(json!({"paidAt": null}));

        let before = rule("paidAt", DataType::Datetime, ConditionOperator::LessThan)
            .with_value(json!("1970-01-02"));
        assert!(before.evaluate(&m));

        let absent = rule("missing", DataType::Datetime, ConditionOperator::LessThan)
            .with_value(json!("1970-01-02"));
        assert!(!absent.evaluate(&m));
    }

    #[test]
    fn test_supports_matrix() {
        assert!(DataType::String.supports(ConditionOperator::Contains));
        assert!(!DataType::Number.supports(ConditionOperator::Contains));
        assert!(DataType::Datetime.supports(ConditionOperator::LessOrEqual));
        assert!(DataType::Boolean.supports(ConditionOperator::IsFalse));
        assert!(!DataType::Boolean.supports(ConditionOperator::Equals));
        assert!(DataType::Unknown.supports(ConditionOperator::Exists));
        assert!(!DataType::Unknown.supports(ConditionOperator::Equals));
    }
}
