//! Extractor field schema and extraction results

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_FIELD_NAME: &str = "Field";
const DEFAULT_TABLE_NAME: &str = "Table";
const DEFAULT_COLUMN_NAME: &str = "Column";

/// Declared header field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFieldSpec {
    #[serde(default)]
    pub field_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Declared table column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    #[serde(default)]
    pub column_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Declared table type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableTypeSpec {
    #[serde(default)]
    pub table_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

/// Shape extraction output must conform to
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractorSchema {
    #[serde(default)]
    pub header_fields: Vec<HeaderFieldSpec>,

    #[serde(default)]
    pub table_types: Vec<TableTypeSpec>,
}

impl ExtractorSchema {
    pub fn with_header_field(mut self, field_name: impl Into<String>) -> Self {
        self.header_fields.push(HeaderFieldSpec {
            field_name: field_name.into(),
            description: None,
            required: None,
        });
        self
    }

    pub fn with_table(mut self, table_name: impl Into<String>, columns: &[&str]) -> Self {
        self.table_types.push(TableTypeSpec {
            table_name: table_name.into(),
            description: None,
            required: None,
            columns: columns
                .iter()
                .map(|c| ColumnSpec {
                    column_name: c.to_string(),
                    description: None,
                })
                .collect(),
        });
        self
    }

    /// The schema's shape with every value set to null
    pub fn empty_result(&self) -> ExtractionResult {
        ExtractionResult {
            header_fields: self
                .header_fields
                .iter()
                .map(|f| ExtractedField {
                    field_name: name_or(&f.field_name, DEFAULT_FIELD_NAME),
                    value: Value::Null,
                })
                .collect(),
            table_types: self
                .table_types
                .iter()
                .map(|t| ExtractedTable {
                    table_name: name_or(&t.table_name, DEFAULT_TABLE_NAME),
                    columns: t
                        .columns
                        .iter()
                        .map(|c| ExtractedColumn {
                            column_name: name_or(&c.column_name, DEFAULT_COLUMN_NAME),
                            value: Value::Null,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

fn name_or(name: &str, default: &str) -> String {
    if name.is_empty() {
        default.to_string()
    } else {
        name.to_string()
    }
}

/// Extracted header field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedField {
    pub field_name: String,

    #[serde(default)]
    pub value: Value,
}

/// Extracted table column values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedColumn {
    pub column_name: String,

    #[serde(default)]
    pub value: Value,
}

/// Extracted table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTable {
    pub table_name: String,

    #[serde(default)]
    pub columns: Vec<ExtractedColumn>,
}

/// Extraction output mirroring an [`ExtractorSchema`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    #[serde(default)]
    pub header_fields: Vec<ExtractedField>,

    #[serde(default)]
    pub table_types: Vec<ExtractedTable>,
}

impl ExtractionResult {
    /// Look up a header field value by name
    pub fn header_value(&self, field_name: &str) -> Option<&Value> {
        self.header_fields
            .iter()
            .find(|f| f.field_name == field_name)
            .map(|f| &f.value)
    }
}

/// Fill the schema's shape with nulls when the provider produced no result
///
/// A produced result is returned as-is.
pub fn normalize_extraction_result(
    result: Option<ExtractionResult>,
    schema: &ExtractorSchema,
) -> ExtractionResult {
    result.unwrap_or_else(|| schema.empty_result())
}
