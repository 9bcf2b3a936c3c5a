pub mod mapping;
pub mod reader;
pub mod transformer;

pub use mapping::{resolve_mapping, ColumnBinding, EffectiveColumnMap, MappingRequest};
pub use reader::{string_record_to_vec, validate_upload, CsvUpload, ParsedCsv};
pub use transformer::{transform_rows, Record};
