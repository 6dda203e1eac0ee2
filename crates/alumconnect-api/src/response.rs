//! Uniform success envelope
//!
//! Every successful response carries `{statusCode, data, message, success}`
//! so clients can treat success and error payloads symmetrically.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.as_u16() < 400,
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, data, message)
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, data, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_envelope_shape() {
        let resp = ApiResponse::ok(json!({"k": "v"}), "done");
        let value: Value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["data"]["k"], "v");
        assert_eq!(value["message"], "done");
        assert_eq!(value["success"], true);
    }

    #[test]
    fn test_created_is_success() {
        let resp = ApiResponse::created(json!({}), "made");
        assert_eq!(resp.status_code, 201);
        assert!(resp.success);
    }
}
