mod frame;
mod response;
mod status;

pub use frame::StreamFrame;
pub use response::RawResponse;
pub use status::StatusBody;
