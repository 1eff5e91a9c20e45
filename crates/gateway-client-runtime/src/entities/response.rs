use bytes::{Bytes, BytesMut};
use futures::stream::BoxStream;
use futures::StreamExt;

use crate::error::CallError;

/// An HTTP response as handed back by a transport: the status and the body
/// as a stream of chunks
pub struct RawResponse {
    pub status: u16,
    pub body: BoxStream<'static, Result<Bytes, CallError>>,
}

impl RawResponse {
    pub fn new(status: u16, body: BoxStream<'static, Result<Bytes, CallError>>) -> Self {
        Self { status, body }
    }

    /// A response whose body is a single chunk
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        Self::new(status, futures::stream::once(async move { Ok(body) }).boxed())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read the whole body
    pub async fn collect(self) -> Result<Bytes, CallError> {
        let mut body = self.body;
        let mut buffer = BytesMut::new();
        while let Some(chunk) = body.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer.freeze())
    }
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
