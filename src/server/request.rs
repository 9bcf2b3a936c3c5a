use crate::csv_processor::{CsvUpload, MappingRequest};
use crate::import::{ImportRequest, MappingInput};
use axum::{
    body::to_bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::Deserialize;
use serde_json::Value as JsonValue;

#[derive(Debug, Default, Deserialize)]
struct JsonParams {
    map_to: Option<String>,
    mappings: Option<JsonValue>,
}

/// Collects the import parameters from either a multipart form or a JSON
/// body. Unreadable input yields missing parameters, never a transport error.
pub async fn read_import_request<S>(request: Request, state: &S, body_limit: usize) -> ImportRequest
where
    S: Send + Sync,
{
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        match Multipart::from_request(request, state).await {
            Ok(multipart) => read_multipart(multipart).await,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected multipart body");
                ImportRequest::default()
            }
        }
    } else {
        read_json(request, body_limit).await
    }
}

async fn read_json(request: Request, body_limit: usize) -> ImportRequest {
    let bytes = match to_bytes(request.into_body(), body_limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            return ImportRequest::default();
        }
    };

    let params: JsonParams = if bytes.is_empty() {
        JsonParams::default()
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Request body is not a JSON object");
            JsonParams::default()
        })
    };

    ImportRequest {
        map_to: params.map_to,
        csv: None,
        mappings: params
            .mappings
            .as_ref()
            .map(mapping_from_json)
            .unwrap_or_default(),
    }
}

async fn read_multipart(mut multipart: Multipart) -> ImportRequest {
    let mut request = ImportRequest::default();
    let mut json_mappings: Option<MappingInput> = None;
    let mut bracketed = MappingRequest::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Stopped reading multipart body");
                break;
            }
        };
        let name = field.name().unwrap_or_default().to_string();

        if name == "csv" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            match field.bytes().await {
                Ok(bytes) => request.csv = Some(CsvUpload::new(file_name, bytes.to_vec())),
                Err(e) => tracing::warn!(error = %e, file_name = %file_name, "Failed to read upload"),
            }
            continue;
        }

        let text = match field.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, field = %name, "Failed to read form field");
                continue;
            }
        };

        if name == "map_to" {
            request.map_to = Some(text);
        } else if name == "mappings" {
            json_mappings = Some(match serde_json::from_str::<JsonValue>(&text) {
                Ok(value) => mapping_from_json(&value),
                Err(e) => MappingInput::Malformed(e.to_string()),
            });
        } else if let Some(key) = bracketed_key(&name) {
            bracketed.insert(key.to_string(), text);
        } else {
            tracing::debug!(field = %name, "Ignoring unknown form field");
        }
    }

    request.mappings = match json_mappings {
        Some(MappingInput::Provided(mut mapping)) => {
            mapping.extend(bracketed);
            MappingInput::Provided(mapping)
        }
        Some(MappingInput::Malformed(reason)) => MappingInput::Malformed(reason),
        Some(MappingInput::Absent) | None if !bracketed.is_empty() => {
            MappingInput::Provided(bracketed)
        }
        Some(MappingInput::Absent) | None => MappingInput::Absent,
    };

    request
}

/// `mappings[A]` -> `A`
fn bracketed_key(name: &str) -> Option<&str> {
    name.strip_prefix("mappings[")
        .and_then(|rest| rest.strip_suffix(']'))
}

fn mapping_from_json(value: &JsonValue) -> MappingInput {
    match value {
        JsonValue::Null => MappingInput::Absent,
        JsonValue::Object(object) => {
            let mut mapping = MappingRequest::new();
            for (field, alias) in object {
                match alias.as_str() {
                    Some(alias) => {
                        mapping.insert(field.clone(), alias.to_string());
                    }
                    None => {
                        return MappingInput::Malformed(format!(
                            "output key for '{}' must be a string",
                            field
                        ))
                    }
                }
            }
            MappingInput::Provided(mapping)
        }
        _ => MappingInput::Malformed("expected an object of field to output key".to_string()),
    }
}
