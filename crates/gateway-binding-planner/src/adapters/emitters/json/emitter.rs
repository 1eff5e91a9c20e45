use serde_json::{json, Value};

use crate::entities::{
    BindingPlan, BodySource, Element, FieldChain, FieldKind, PlannedSegment, QueryParameter,
    QueryShape, ScalarKind, Schema,
};
use crate::error::GeneratorError;
use crate::use_cases::ports::Emitter;

/// Emitter writing the language-neutral binding plan document
///
/// The document lists one entry per planned method, with path placeholders
/// and query keys named under the plan's naming policy:
///
/// ```json
/// {
///   "methods": [{
///     "service": "main.CounterService",
///     "method": "HTTPGetWithURLSearchParams",
///     "verb": "GET",
///     "path": "/api/query/{a}",
///     "pathParameters": [{"field": "a", "key": "a", "wildcard": false}],
///     "body": {"source": "none"},
///     "query": [{"field": "b", "key": "b", "shape": "scalar", "type": "string", "omitZero": true}],
///     "oneofs": [],
///     "request": ".main.HTTPGetWithURLSearchParamsRequest",
///     "response": {"type": ".main.HTTPGetWithURLSearchParamsResponse", "streaming": false}
///   }]
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Json {
    pub fn new() -> Self {
        Self
    }

    fn method(&self, schema: &Schema, plan: &BindingPlan) -> Result<Value, GeneratorError> {
        let path_parameters: Vec<Value> = plan
            .path
            .iter()
            .filter_map(|segment| match segment {
                PlannedSegment::Field { chain, wildcard } => Some(json!({
                    "field": chain.path().to_string(),
                    "key": chain.key(plan.naming),
                    "wildcard": wildcard,
                })),
                PlannedSegment::Literal(_) => None,
            })
            .collect();

        let body = match &plan.body {
            BodySource::None => json!({"source": "none"}),
            BodySource::WholeRequest => json!({"source": "request"}),
            BodySource::Field(chain) => json!({
                "source": "field",
                "field": chain.path().to_string(),
                "key": chain.key(plan.naming),
                "type": leaf_message(schema, chain),
            }),
        };

        let query = plan
            .query
            .iter()
            .map(|parameter| self.parameter(parameter))
            .collect::<Result<Vec<_>, _>>()?;

        let oneofs: Vec<Value> = plan
            .oneofs
            .iter()
            .map(|group| {
                json!({
                    "name": group.name,
                    "fields": group
                        .members
                        .iter()
                        .map(|member| member.key(plan.naming))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        Ok(json!({
            "service": plan.service,
            "method": plan.method,
            "verb": plan.verb,
            "path": plan.path_template(),
            "pathParameters": path_parameters,
            "body": body,
            "query": query,
            "oneofs": oneofs,
            "request": schema.type_name(plan.request),
            "response": {
                "type": schema.type_name(plan.response.message_type()),
                "streaming": plan.is_streaming(),
            },
        }))
    }

    fn parameter(&self, parameter: &QueryParameter) -> Result<Value, GeneratorError> {
        let shape = match parameter.shape {
            QueryShape::Scalar => "scalar",
            QueryShape::Repeated => "repeated",
            QueryShape::Map => "map",
        };
        let kind = match parameter.chain.leaf().kind {
            FieldKind::Scalar(kind) | FieldKind::Repeated(Element::Scalar(kind)) => kind,
            FieldKind::Map => ScalarKind::String,
            FieldKind::Message(_) | FieldKind::Repeated(Element::Message(_)) => {
                return Err(GeneratorError::EmitError(format!(
                    "query parameter `{}` does not end on a scalar",
                    parameter.key
                )))
            }
        };
        Ok(json!({
            "field": parameter.chain.path().to_string(),
            "key": parameter.key,
            "shape": shape,
            "type": kind,
            "omitZero": parameter.omit_zero,
        }))
    }
}

fn leaf_message(schema: &Schema, chain: &FieldChain) -> Value {
    chain
        .leaf()
        .kind
        .message_type()
        .map(|id| Value::String(schema.type_name(id)))
        .unwrap_or(Value::Null)
}

impl Emitter for Json {
    type Output = Value;

    fn emit(&self, schema: &Schema, plans: &[BindingPlan]) -> Result<Self::Output, GeneratorError> {
        let methods = plans
            .iter()
            .map(|plan| self.method(schema, plan))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(json!({ "methods": methods }))
    }
}
