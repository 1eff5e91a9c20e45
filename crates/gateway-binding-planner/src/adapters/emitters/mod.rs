mod json;

pub use json::emitter::Json;
