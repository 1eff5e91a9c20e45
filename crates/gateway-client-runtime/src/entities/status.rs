use serde::Deserialize;
use serde_json::Value;

use crate::error::CallError;

/// JSON error object written by the gateway, e.g.
/// `{"code": 14, "message": "this increment does not work", "details": []}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StatusBody {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<Value>,
}

impl StatusBody {
    pub fn into_error(self) -> CallError {
        CallError::Status {
            code: tonic::Code::from(self.code),
            message: self.message,
            details: self.details,
        }
    }

    /// Map a non-2xx response body to a status error. Bodies that are not a
    /// status object become `Unknown` carrying the HTTP status.
    pub fn from_response(status: u16, body: &[u8]) -> CallError {
        match serde_json::from_slice::<StatusBody>(body) {
            Ok(status_body) => status_body.into_error(),
            Err(_) => CallError::Status {
                code: tonic::Code::Unknown,
                message: format!(
                    "HTTP status {}: {}",
                    status,
                    String::from_utf8_lossy(body).trim()
                ),
                details: Vec::new(),
            },
        }
    }
}
