use bytes::{Buf, BytesMut};
use serde_json::Value;

use crate::entities::StreamFrame;
use crate::error::CallError;

/// Splits a server streaming body into newline-delimited frames
///
/// Chunks may cut frames anywhere; incomplete lines stay buffered until the
/// next chunk or [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every frame it completes, in order
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<Value, CallError>> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(end) = self.buffer.iter().position(|b| *b == b'\n') {
            let line = self.buffer.split_to(end);
            self.buffer.advance(1);
            if let Some(frame) = decode_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Decode what is left once the body has ended
    pub fn finish(mut self) -> Option<Result<Value, CallError>> {
        let rest = self.buffer.split();
        decode_line(&rest)
    }
}

fn decode_line(line: &[u8]) -> Option<Result<Value, CallError>> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }
    Some(
        serde_json::from_slice::<StreamFrame>(line)
            .map_err(|e| CallError::Decode(format!("invalid stream frame: {}", e)))
            .and_then(StreamFrame::into_result),
    )
}
