//! Response envelope shared by every resource route.
//!
//! Success and failure bodies have the same shape:
//!
//! ```json
//! { "status": 201, "message": "success", "data": { "data": { "insertedId": "..." } } }
//! { "status": 400, "message": "error", "data": { "data": "name: Name is required" } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub const MESSAGE_SUCCESS: &str = "success";
pub const MESSAGE_ERROR: &str = "error";

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: &'static str,
    pub data: Payload<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Payload<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(status: StatusCode, data: T) -> Self {
        Self {
            status: status.as_u16(),
            message: MESSAGE_SUCCESS,
            data: Payload { data },
        }
    }

    pub fn error(status: StatusCode, data: T) -> Self {
        Self {
            status: status.as_u16(),
            message: MESSAGE_ERROR,
            data: Payload { data },
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
