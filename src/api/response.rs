use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Serialize `data` as the JSON body and report `count` in `X-Total-Count`.
pub fn with_total_count<T: Serialize>(data: T, count: usize) -> Response {
    let json = match serde_json::to_string(&data) {
        Ok(json) => json,
        Err(_) => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert("X-Total-Count", HeaderValue::from(count));

    (StatusCode::OK, headers, json).into_response()
}
