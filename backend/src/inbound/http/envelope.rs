//! JSON envelopes wrapping every API response.
//!
//! ```text
//! {"success":true,"message":"...","data":{...}}
//! {"success":false,"error_message":"...","error":"not_found","details":{...}}
//! ```

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::cache_control::private_no_cache_header;

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    /// Wrap `data` with a human-readable `message`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

/// Failed response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub error_message: String,
    pub error: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl From<&Error> for FailureEnvelope {
    fn from(error: &Error) -> Self {
        Self {
            success: false,
            error_message: error.message().to_owned(),
            error: error.code(),
            details: error.details().cloned(),
            trace_id: error.trace_id().map(str::to_owned),
        }
    }
}

fn respond<T: Serialize>(status: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(private_no_cache_header())
        .json(Envelope::ok(message, data))
}

/// `200 OK` with a success envelope.
pub(crate) fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::OK, message, data)
}

/// `201 Created` with a success envelope.
pub(crate) fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::CREATED, message, data)
}
