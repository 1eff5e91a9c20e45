use serde_json::Value;
use url::form_urlencoded;

use super::Verb;

/// A binding plan applied to a concrete request value
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRequest {
    pub verb: Verb,
    /// Path with every variable interpolated
    pub path: String,
    /// Query pairs in plan order
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RenderedRequest {
    /// Form-urlencoded query string, empty when there are no pairs
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }

    /// Path followed by `?query` when the query is not empty
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string())
        }
    }
}
