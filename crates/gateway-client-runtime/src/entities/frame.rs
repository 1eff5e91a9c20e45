use serde::Deserialize;
use serde_json::Value;

use super::StatusBody;
use crate::error::CallError;

/// One newline-delimited frame of a server streaming response:
/// `{"result": {...}}` or `{"error": {"code": .., "message": ..}}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StreamFrame {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<StatusBody>,
}

impl StreamFrame {
    pub fn into_result(self) -> Result<Value, CallError> {
        match (self.error, self.result) {
            (Some(status), _) => Err(status.into_error()),
            (None, Some(result)) => Ok(result),
            (None, None) => Err(CallError::Decode(
                "stream frame carries neither result nor error".to_string(),
            )),
        }
    }
}
