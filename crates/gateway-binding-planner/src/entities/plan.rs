use serde_json::Value;

use super::{FieldChain, FieldPath, NamingPolicy, TypeId, Verb};

/// A path segment of a binding plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedSegment {
    Literal(String),
    /// A scalar field, percent-encoded when rendered; `wildcard` values keep their `/`
    Field { chain: FieldChain, wildcard: bool },
}

/// Where the HTTP body comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    None,
    WholeRequest,
    /// A singular message field of the request
    Field(FieldChain),
}

/// Serialization rule of a query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryShape {
    /// `key=value`
    Scalar,
    /// One `key=value` pair per element
    Repeated,
    /// One `key.entry=value` pair per entry
    Map,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameter {
    pub chain: FieldChain,
    /// Dotted key under the plan's naming policy
    pub key: String,
    pub shape: QueryShape,
    pub omit_zero: bool,
}

/// A oneof group reachable from the request through singular messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofGroup {
    /// Declared dotted name, e.g. `entry.source_detail`
    pub name: String,
    pub members: Vec<FieldChain>,
}

impl OneofGroup {
    /// Members carrying a non-null value in `request`
    pub fn populated<'p>(&'p self, request: &Value, naming: NamingPolicy) -> Vec<&'p FieldChain> {
        self.members
            .iter()
            .filter(|member| member.extract(request, naming).is_some())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseShape {
    Unary(TypeId),
    Stream(TypeId),
}

impl ResponseShape {
    pub fn message_type(&self) -> TypeId {
        match self {
            ResponseShape::Unary(id) | ResponseShape::Stream(id) => *id,
        }
    }
}

/// Language-neutral description of how one RPC method maps onto HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPlan {
    /// Fully qualified service name
    pub service: String,
    pub method: String,
    pub verb: Verb,
    pub request: TypeId,
    pub path: Vec<PlannedSegment>,
    pub body: BodySource,
    pub query: Vec<QueryParameter>,
    /// At most one member of each group may be set in a request
    pub oneofs: Vec<OneofGroup>,
    pub response: ResponseShape,
    pub naming: NamingPolicy,
}

impl BindingPlan {
    /// Field paths interpolated into the URL path
    pub fn path_fields(&self) -> impl Iterator<Item = &FieldPath> {
        self.path.iter().filter_map(|segment| match segment {
            PlannedSegment::Field { chain, .. } => Some(chain.path()),
            PlannedSegment::Literal(_) => None,
        })
    }

    pub fn body_field(&self) -> Option<&FieldPath> {
        match &self.body {
            BodySource::Field(chain) => Some(chain.path()),
            _ => None,
        }
    }

    /// Path with `{key}` placeholders named under the plan's naming policy,
    /// e.g. `/api/{rCamel.nameCamel}:hello`
    pub fn path_template(&self) -> String {
        self.path
            .iter()
            .map(|segment| match segment {
                PlannedSegment::Literal(text) => text.clone(),
                PlannedSegment::Field { chain, .. } => format!("{{{}}}", chain.key(self.naming)),
            })
            .collect()
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.response, ResponseShape::Stream(_))
    }
}
