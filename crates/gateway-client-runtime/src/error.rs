use gateway_binding_planner::RenderError;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while calling a gateway method
#[derive(Error, Debug)]
pub enum CallError {
    /// The gateway answered with a gRPC status
    #[error("Status error ({code:?}): {message}")]
    Status {
        code: tonic::Code,
        message: String,
        details: Vec<Value>,
    },

    /// The request never produced an HTTP response
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl CallError {
    /// The gRPC status code, for status errors only
    pub fn code(&self) -> Option<tonic::Code> {
        match self {
            CallError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
