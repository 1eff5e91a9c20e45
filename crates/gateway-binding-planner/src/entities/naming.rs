use heck::ToLowerCamelCase;
use serde::{Deserialize, Serialize};

/// Naming policy applied to field names when they leave the schema
/// (JSON keys, path placeholders, query keys)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// lowerCamelCase, the default JSON mapping of the gateway
    #[default]
    CamelCase,
    /// The declared (snake_case) field name
    ProtoName,
}

impl NamingPolicy {
    pub fn apply(&self, declared: &str) -> String {
        match self {
            NamingPolicy::CamelCase => declared.to_lower_camel_case(),
            NamingPolicy::ProtoName => declared.to_string(),
        }
    }
}
