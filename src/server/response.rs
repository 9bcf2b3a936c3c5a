use crate::csv_processor::Record;
use crate::utils::ImportError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct DataEnvelope {
    data: Vec<Record>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

/// Exactly one of the two envelopes is rendered per request.
#[derive(Debug)]
pub enum ImportResponse {
    Data(Vec<Record>),
    Error(ImportError),
}

impl From<crate::utils::Result<Vec<Record>>> for ImportResponse {
    fn from(result: crate::utils::Result<Vec<Record>>) -> Self {
        match result {
            Ok(records) => ImportResponse::Data(records),
            Err(e) => ImportResponse::Error(e),
        }
    }
}

impl From<&ImportError> for ErrorBody {
    fn from(e: &ImportError) -> Self {
        Self {
            status: e.status().as_u16(),
            code: e.code(),
            message: e.message(),
        }
    }
}

impl IntoResponse for ImportResponse {
    fn into_response(self) -> Response {
        match self {
            ImportResponse::Data(data) => (StatusCode::OK, Json(DataEnvelope { data })).into_response(),
            ImportResponse::Error(e) => (
                e.status(),
                Json(ErrorEnvelope {
                    error: ErrorBody::from(&e),
                }),
            )
                .into_response(),
        }
    }
}
