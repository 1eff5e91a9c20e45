use futures::StreamExt;
use gateway_binding_planner::entities::BindingPlan;
use gateway_binding_planner::use_cases::render;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use super::decode_stream::FrameDecoder;
use super::ports::Transport;
use crate::entities::{RawResponse, StatusBody};
use crate::error::CallError;

const DEFAULT_STREAM_BUFFER: usize = 16;

/// Calls gateway methods described by binding plans
pub struct Client<T> {
    transport: Arc<T>,
    stream_buffer: usize,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            stream_buffer: self.stream_buffer,
        }
    }
}

impl<T: Transport + 'static> Client<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }

    /// Capacity of the channel returned by [`server_streaming`](Self::server_streaming)
    pub fn with_stream_buffer(mut self, capacity: usize) -> Self {
        self.stream_buffer = capacity.max(1);
        self
    }

    /// Call a unary method and decode its JSON response
    #[instrument(skip_all, fields(service = %plan.service, method = %plan.method))]
    pub async fn unary<R: DeserializeOwned>(
        &self,
        plan: &BindingPlan,
        request: &Value,
    ) -> Result<R, CallError> {
        let response = self.send(plan, request).await?;
        let status = response.status;
        let success = response.is_success();
        let body = response.collect().await?;
        if !success {
            return Err(StatusBody::from_response(status, &body));
        }
        serde_json::from_slice(&body)
            .map_err(|e| CallError::Decode(format!("invalid response body: {}", e)))
    }

    /// Call a server streaming method
    ///
    /// Messages arrive on the returned channel in the order the gateway sent
    /// them. An error frame is delivered as an `Err` item. The channel closes
    /// when the response body ends or the receiver is dropped.
    #[instrument(skip_all, fields(service = %plan.service, method = %plan.method))]
    pub async fn server_streaming(
        &self,
        plan: &BindingPlan,
        request: &Value,
    ) -> Result<mpsc::Receiver<Result<Value, CallError>>, CallError> {
        let response = self.send(plan, request).await?;
        if !response.is_success() {
            let status = response.status;
            let body = response.collect().await?;
            return Err(StatusBody::from_response(status, &body));
        }

        let (tx, rx) = mpsc::channel(self.stream_buffer);
        let mut body = response.body;
        tokio::spawn(async move {
            let mut decoder = FrameDecoder::new();
            while let Some(chunk) = body.next().await {
                let frames = match chunk {
                    Ok(chunk) => decoder.push(&chunk),
                    Err(error) => vec![Err(error)],
                };
                for frame in frames {
                    if tx.send(frame).await.is_err() {
                        debug!("stream receiver dropped");
                        return;
                    }
                }
            }
            if let Some(frame) = decoder.finish() {
                let _ = tx.send(frame).await;
            }
        });

        Ok(rx)
    }

    async fn send(&self, plan: &BindingPlan, request: &Value) -> Result<RawResponse, CallError> {
        let rendered = render(plan, request)?;
        debug!(verb = %rendered.verb, path = %rendered.path_and_query(), "sending request");
        let response = self.transport.send(rendered).await?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}
