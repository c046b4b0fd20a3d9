//! Extractor domain module

mod entity;
mod repository;
mod schema;

pub use entity::Extractor;
pub use repository::ExtractorRepository;
pub use schema::{
    normalize_extraction_result, ColumnSpec, ExtractedColumn, ExtractedField, ExtractedTable,
    ExtractionResult, ExtractorSchema, HeaderFieldSpec, TableTypeSpec,
};

#[cfg(test)]
pub use repository::MockExtractorRepository;
