use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn success<T>(data: T, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    let body = ApiResponse {
        success: true,
        message: Some(message.into()),
        data: Some(data),
        count: None,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Success with an explicit item count, for list endpoints.
pub fn success_list<T>(data: Vec<T>, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    let count = data.len();
    let body = ApiResponse {
        success: true,
        message: Some(message.into()),
        data: Some(data),
        count: Some(count),
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub fn created<T>(data: T, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    let body = ApiResponse {
        success: true,
        message: Some(message.into()),
        data: Some(data),
        count: None,
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

pub fn error(message: impl Into<String>, details: Option<String>, status: StatusCode) -> Response {
    let body = ApiErrorResponse {
        success: false,
        message: message.into(),
        error: details,
    };

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_envelope_carries_count() {
        let body = ApiResponse {
            success: true,
            message: Some("ok".to_string()),
            data: Some(vec![1, 2, 3]),
            count: Some(3),
        };
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["count"], 3);
    }

    #[test]
    fn error_envelope_omits_absent_details() {
        let body = ApiErrorResponse {
            success: false,
            message: "Not found".to_string(),
            error: None,
        };
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value["success"], false);
        assert!(value.get("error").is_none());
    }
}
