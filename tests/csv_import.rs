use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use csv_import::{router, AppConfig, AppState};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

const BOUNDARY: &str = "csv-import-test-boundary";
const URI: &str = "/csv/import";
const COLUMNS: [&str; 4] = ["A", "B", "C", "D"];

const VALID: &[u8] = include_bytes!("fixtures/valid.csv");
const ONLY_HEADER: &[u8] = include_bytes!("fixtures/only-header.csv");
const EMPTY: &[u8] = include_bytes!("fixtures/empty.file");
const NON_CSV: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x01";

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn app() -> Router {
    router(AppState::from_config(&AppConfig::default()).unwrap())
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: text/csv\r\n\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn post_multipart(parts: &[Part<'_>]) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri(URI)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(request).await
}

async fn send(request: Request<Body>) -> (StatusCode, String) {
    send_to(app(), request).await
}

async fn send_to(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn assert_error(status: StatusCode, body: &str, code: &str) {
    assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
    let json: JsonValue = serde_json::from_str(body).unwrap();
    let error = &json["error"];
    assert_eq!(error["status"], 400);
    assert_eq!(error["code"], code);
    assert!(error["message"].is_string());
    assert!(json.get("data").is_none());
}

fn data(status: StatusCode, body: &str) -> Vec<JsonValue> {
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    let json: JsonValue = serde_json::from_str(body).unwrap();
    assert!(json.get("error").is_none());
    json["data"].as_array().unwrap().clone()
}

#[tokio::test]
async fn test_request_without_data() {
    let request = Request::builder()
        .method("POST")
        .uri(URI)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;
    assert_error(status, &body, "MAP_MODEL_NOT_PASSED");
}

#[tokio::test]
async fn test_only_csv() {
    let (status, body) = post_multipart(&[Part::File("csv", "empty.file", EMPTY)]).await;
    assert_error(status, &body, "MAP_MODEL_NOT_PASSED");
}

#[tokio::test]
async fn test_unknown_map_model() {
    let (status, body) = post_multipart(&[
        Part::File("csv", "empty.file", EMPTY),
        Part::Text("map_to", "NonExist"),
    ])
    .await;
    assert_error(status, &body, "MAP_MODEL_NOT_FOUND");
}

#[tokio::test]
async fn test_missing_csv() {
    let (status, body) = post_multipart(&[Part::Text("map_to", "Product")]).await;
    assert_error(status, &body, "CSV_INVALID");
}

#[tokio::test]
async fn test_empty_file() {
    let (status, body) = post_multipart(&[
        Part::File("csv", "empty.file", EMPTY),
        Part::Text("map_to", "Product"),
    ])
    .await;
    assert_error(status, &body, "CSV_INVALID");
}

#[tokio::test]
async fn test_non_csv() {
    let (status, body) = post_multipart(&[
        Part::File("csv", "non-csv.file", NON_CSV),
        Part::Text("map_to", "Product"),
    ])
    .await;
    assert_error(status, &body, "CSV_INVALID");
}

#[tokio::test]
async fn test_only_header() {
    let (status, body) = post_multipart(&[
        Part::File("csv", "only-header.csv", ONLY_HEADER),
        Part::Text("map_to", "Product"),
    ])
    .await;
    assert_error(status, &body, "CSV_INVALID");
}

#[tokio::test]
async fn test_valid() {
    let (status, body) = post_multipart(&[
        Part::File("csv", "valid.csv", VALID),
        Part::Text("map_to", "Product"),
    ])
    .await;

    let records = data(status, &body);
    assert_eq!(records.len(), 3);
    for record in &records {
        for column in COLUMNS {
            assert_eq!(record[column], format!("val_{}", column));
        }
    }
}

#[tokio::test]
async fn test_valid_with_fully_qualified_alias() {
    let (status, body) = post_multipart(&[
        Part::File("csv", "valid.csv", VALID),
        Part::Text("map_to", "App\\Product"),
    ])
    .await;
    assert_eq!(data(status, &body).len(), 3);
}

#[tokio::test]
async fn test_mappings_invalid() {
    let (status, body) = post_multipart(&[
        Part::File("csv", "valid.csv", VALID),
        Part::Text("map_to", "Product"),
        Part::Text("mappings[XXX]", "xxx"),
    ])
    .await;
    assert_error(status, &body, "MAPPINGS_INVALID");
}

#[tokio::test]
async fn test_mappings_valid_bracketed_fields() {
    let (status, body) = post_multipart(&[
        Part::File("csv", "valid.csv", VALID),
        Part::Text("map_to", "Product"),
        Part::Text("mappings[A]", "aaa"),
        Part::Text("mappings[C]", "ccc"),
    ])
    .await;

    assert!(body.contains(r#"{"aaa":"val_A","B":"val_B","ccc":"val_C","D":"val_D"}"#));

    let records = data(status, &body);
    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record["aaa"], "val_A");
        assert_eq!(record["B"], "val_B");
        assert_eq!(record["ccc"], "val_C");
        assert_eq!(record["D"], "val_D");
        assert!(record.get("A").is_none());
        assert!(record.get("C").is_none());
    }
}

#[tokio::test]
async fn test_mappings_valid_json_field() {
    let (status, body) = post_multipart(&[
        Part::File("csv", "valid.csv", VALID),
        Part::Text("map_to", "Product"),
        Part::Text("mappings", r#"{"A": "aaa", "C": "ccc"}"#),
    ])
    .await;

    let records = data(status, &body);
    assert_eq!(records[0]["aaa"], "val_A");
    assert_eq!(records[0]["ccc"], "val_C");
}

#[tokio::test]
async fn test_malformed_mappings_json() {
    let (status, body) = post_multipart(&[
        Part::File("csv", "valid.csv", VALID),
        Part::Text("map_to", "Product"),
        Part::Text("mappings", "not json"),
    ])
    .await;
    assert_error(status, &body, "MAPPINGS_INVALID");
}

#[tokio::test]
async fn test_upload_over_body_limit() {
    let oversize = vec![b'x'; 4096];
    let body = multipart_body(&[
        Part::Text("map_to", "Product"),
        Part::File("csv", "big.csv", &oversize),
    ]);

    // First chunk ends right after the csv part headers, so map_to is read in full.
    let split = body
        .windows(4)
        .rposition(|w| w == b"\r\n\r\n")
        .map(|i| i + 4)
        .unwrap();
    let (head, rest) = body.split_at(split);

    let mut config = AppConfig::default();
    config.server.max_upload_bytes = head.len() + 16;
    let app = router(AppState::from_config(&config).unwrap());

    let mut chunks = vec![head.to_vec()];
    chunks.extend(rest.chunks(512).map(|c| c.to_vec()));
    let stream = futures::stream::iter(chunks.into_iter().map(Ok::<_, std::io::Error>));

    let request = Request::builder()
        .method("POST")
        .uri(URI)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from_stream(stream))
        .unwrap();

    let (status, body) = send_to(app, request).await;
    assert_error(status, &body, "CSV_INVALID");
}

#[tokio::test]
async fn test_identical_requests_identical_responses() {
    let parts = [
        Part::File("csv", "valid.csv", VALID),
        Part::Text("map_to", "Product"),
        Part::Text("mappings[B]", "bbb"),
    ];
    let first = post_multipart(&parts).await;
    let second = post_multipart(&parts).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_targets_endpoint() {
    let request = Request::builder().uri("/targets").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);

    let json: JsonValue = serde_json::from_str(&body).unwrap();
    assert_eq!(json["data"][0]["name"], "Product");
    assert_eq!(json["data"][0]["fields"], serde_json::json!(["A", "B", "C", "D"]));
}

#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);

    let json: JsonValue = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "csv-import");
}
