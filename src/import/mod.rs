use crate::csv_processor::{
    resolve_mapping, transform_rows, validate_upload, CsvUpload, MappingRequest, Record,
};
use crate::state::AppState;
use crate::utils::{ImportError, Result};

/// The `mappings` parameter as received. Malformed input is kept until the
/// mapping stage so earlier stages still decide the error code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MappingInput {
    #[default]
    Absent,
    Provided(MappingRequest),
    Malformed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    pub map_to: Option<String>,
    pub csv: Option<CsvUpload>,
    pub mappings: MappingInput,
}

/// Runs target resolution, CSV validation, mapping resolution and row
/// transformation in that order, stopping at the first failure.
pub fn run_import(state: &AppState, request: &ImportRequest) -> Result<Vec<Record>> {
    let target = state.registry.resolve(request.map_to.as_deref())?;
    tracing::debug!(model = %target.name, "Resolved target model");

    let parsed = validate_upload(request.csv.as_ref(), &state.allowed_extensions)?;

    let mapping = match &request.mappings {
        MappingInput::Absent => None,
        MappingInput::Provided(m) => Some(m),
        MappingInput::Malformed(reason) => {
            return Err(ImportError::MappingsInvalid(format!(
                "Malformed 'mappings' parameter: {}",
                reason
            )))
        }
    };
    let column_map = resolve_mapping(target, mapping)?;

    let records = transform_rows(&parsed, &column_map);

    tracing::info!(
        model = %target.name,
        file_name = request.csv.as_ref().map(|c| c.file_name.as_str()).unwrap_or_default(),
        rows = records.len(),
        "CSV import mapped"
    );

    Ok(records)
}
