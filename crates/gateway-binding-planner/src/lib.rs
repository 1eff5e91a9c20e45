//! gRPC-gateway Binding Planner
//!
//! Computes, for every RPC method of a schema, how the method maps onto the
//! HTTP/JSON gateway: the URL path with its field bindings, the body source
//! and the query parameters with their zero-value rules. The result is a
//! language-neutral [`BindingPlan`](entities::BindingPlan) handed to an
//! emission backend.
//!
//! # Example
//!
//! ```rust
//! use gateway_binding_planner::prelude::*;
//!
//! fn main() -> Result<(), GeneratorError> {
//!     let mut builder = Schema::builder();
//!     let nested = builder.message(MessageType::new("PostRequest.Nested", "service.proto").with_package("main"));
//!     let request = builder.message(MessageType::new("PostRequest", "service.proto").with_package("main"));
//!     builder
//!         .field(nested, FieldDefinition::scalar("b", ScalarKind::Number))
//!         .field(request, FieldDefinition::scalar("a", ScalarKind::Number))
//!         .field(request, FieldDefinition::message("req", nested));
//!     builder.service(
//!         ServiceDefinition::new("CounterService")
//!             .with_package("main")
//!             .with_method(
//!                 MethodDefinition::new("HTTPPostWithNestedBodyPath", request, nested)
//!                     .with_http(HttpRule::post("/post/{a}").with_body("req")),
//!             ),
//!     );
//!     let schema = builder.build()?;
//!
//!     // Plan every method of the schema
//!     let report = GenerationBuilder::new()
//!         .schema(&schema)
//!         .emitter(DefaultEmitter)
//!         .build()
//!         .execute()?;
//!
//!     // Apply the plan to a request value
//!     let rendered = render(&report.output[0], &json!({"a": 10, "req": {"b": 15}}))?;
//!     assert_eq!(rendered.path_and_query(), "/post/10");
//!     assert_eq!(rendered.body, Some(json!({"b": 15})));
//!
//!     Ok(())
//! }
//! ```

mod adapters;
pub mod entities;
pub mod error;
pub mod use_cases;

pub use error::{GeneratorError, PlanError, RenderError, SchemaError};

pub use adapters::emitters::Json;

/// Default emitter handing the binding plans back unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEmitter;

impl use_cases::ports::Emitter for DefaultEmitter {
    type Output = Vec<entities::BindingPlan>;

    fn emit(
        &self,
        _schema: &entities::Schema,
        plans: &[entities::BindingPlan],
    ) -> Result<Self::Output, GeneratorError> {
        Ok(plans.to_vec())
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::entities::{
        BindingPlan, BodySource, Element, FieldDefinition, FieldKind, FieldPath,
        GenerationReport, GeneratorOptions, HttpRule, MessageType, MethodDefinition,
        MethodFailure, NamingPolicy, PlannedSegment, QueryParameter, QueryShape,
        RenderedRequest, ResponseShape, ScalarKind, Schema, SchemaBuilder, ServiceDefinition,
        TypeId, Verb,
    };
    pub use crate::error::{GeneratorError, PlanError, RenderError, SchemaError};
    pub use crate::use_cases::ports::Emitter;
    pub use crate::use_cases::{render, GenerationBuilder, Planner};
    pub use crate::{DefaultEmitter, Json};

    pub use serde_json::json;
}
