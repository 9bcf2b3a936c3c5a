use crate::utils::{file_extension, ImportError, Result};
use csv::StringRecord;
use serde::Serialize;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Raw file received in the `csv` request field.
#[derive(Debug, Clone, Default)]
pub struct CsvUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl CsvUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Header plus data rows of a structurally valid upload. Cells are untouched strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedCsv {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Checks that the upload exists, is text, and holds a header row followed by
/// at least one data row.
pub fn validate_upload(upload: Option<&CsvUpload>, allowed_extensions: &[String]) -> Result<ParsedCsv> {
    let upload = upload
        .ok_or_else(|| ImportError::CsvInvalid("No file was uploaded in 'csv'".to_string()))?;

    if upload.bytes.is_empty() {
        return Err(ImportError::CsvInvalid(format!(
            "Uploaded file '{}' is empty",
            upload.file_name
        )));
    }

    if !allowed_extensions.is_empty() {
        let accepted = file_extension(&upload.file_name)
            .map(|ext| allowed_extensions.contains(&ext))
            .unwrap_or(false);
        if !accepted {
            return Err(ImportError::CsvInvalid(format!(
                "Uploaded file '{}' must have one of the extensions: {}",
                upload.file_name,
                allowed_extensions.join(", ")
            )));
        }
    }

    let content = upload.bytes.strip_prefix(UTF8_BOM).unwrap_or(&upload.bytes[..]);

    if content.contains(&0) || std::str::from_utf8(content).is_err() {
        return Err(ImportError::CsvInvalid(format!(
            "Uploaded file '{}' is not delimited text",
            upload.file_name
        )));
    }

    parse_csv(content)
}

fn parse_csv(content: &[u8]) -> Result<ParsedCsv> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .from_reader(content);

    let headers = string_record_to_vec(reader.headers()?);
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::CsvInvalid("CSV header row is empty".to_string()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        rows.push(string_record_to_vec(&result?));
    }

    if rows.is_empty() {
        return Err(ImportError::CsvInvalid(
            "CSV contains a header row but no data rows".to_string(),
        ));
    }

    tracing::debug!(columns = headers.len(), rows = rows.len(), "Parsed CSV upload");

    Ok(ParsedCsv { headers, rows })
}

pub fn string_record_to_vec(record: &StringRecord) -> Vec<String> {
    record.iter().map(|s| s.to_string()).collect()
}
