mod call;
mod decode_stream;
pub mod ports;

pub use call::Client;
pub use decode_stream::FrameDecoder;
