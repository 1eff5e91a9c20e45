mod field_chain;
mod field_path;
mod message;
mod method;
mod naming;
mod options;
mod plan;
mod rendered;
mod report;
mod schema;
mod template;

pub use field_chain::FieldChain;
pub use field_path::FieldPath;
pub use message::{Element, FieldDefinition, FieldKind, MessageType, ScalarKind};
pub use method::{HttpRule, MethodDefinition, ServiceDefinition, Verb};
pub use naming::NamingPolicy;
pub use options::GeneratorOptions;
pub use plan::{
    BindingPlan, BodySource, OneofGroup, PlannedSegment, QueryParameter, QueryShape,
    ResponseShape,
};
pub use rendered::RenderedRequest;
pub use report::{GenerationReport, MethodFailure};
pub use schema::{Schema, SchemaBuilder, TypeId};
pub use template::{PathTemplate, Segment};
