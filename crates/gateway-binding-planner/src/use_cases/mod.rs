mod compile_template;
mod generate;
pub mod ports;
mod plan_binding;
mod render_request;
mod resolve_field;
mod serialize_query;

pub use compile_template::compile;
pub use generate::{Generation, GenerationBuilder};
pub use plan_binding::Planner;
pub use render_request::render;
pub use resolve_field::FieldResolver;
pub use serialize_query::{scalar_text, serialize};
