use async_trait::async_trait;
use gateway_binding_planner::entities::RenderedRequest;

use crate::entities::RawResponse;
use crate::error::CallError;

/// Trait for HTTP transports reaching the gateway
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a rendered request.
    ///
    /// Any HTTP response, whatever its status, is returned as a
    /// [`RawResponse`]. Only failures to obtain a response are errors, and
    /// those must be [`CallError::Transport`].
    async fn send(&self, request: RenderedRequest) -> Result<RawResponse, CallError>;
}
