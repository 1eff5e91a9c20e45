use serde::Serialize;
use std::str::FromStr;

use super::TypeId;
use crate::error::SchemaError;

/// HTTP verbs a gateway binding can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verb::Get => write!(f, "GET"),
            Verb::Post => write!(f, "POST"),
            Verb::Put => write!(f, "PUT"),
            Verb::Patch => write!(f, "PATCH"),
            Verb::Delete => write!(f, "DELETE"),
        }
    }
}

impl FromStr for Verb {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Verb::Get),
            "POST" => Ok(Verb::Post),
            "PUT" => Ok(Verb::Put),
            "PATCH" => Ok(Verb::Patch),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(SchemaError::UnsupportedVerb(s.to_string())),
        }
    }
}

/// The HTTP binding annotation of a method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRule {
    pub verb: Verb,
    /// Path template, e.g. `/post/{a}/{c}`
    pub path: String,
    /// Body selector: `*`, a field path, or empty for no body
    pub body: String,
}

impl HttpRule {
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            body: String::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Verb::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Verb::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Verb::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Verb::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Verb::Delete, path)
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// An RPC method of a service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefinition {
    pub name: String,
    /// Fully qualified name of the owning service, set by [`ServiceDefinition::with_method`]
    pub service: String,
    pub request: TypeId,
    pub response: TypeId,
    pub server_streaming: bool,
    /// Client streaming calls cannot be expressed over the gateway
    pub client_streaming: bool,
    pub http: Option<HttpRule>,
}

impl MethodDefinition {
    pub fn new(name: impl Into<String>, request: TypeId, response: TypeId) -> Self {
        Self {
            name: name.into(),
            service: String::new(),
            request,
            response,
            server_streaming: false,
            client_streaming: false,
            http: None,
        }
    }

    pub fn server_streaming(mut self) -> Self {
        self.server_streaming = true;
        self
    }

    pub fn client_streaming(mut self) -> Self {
        self.client_streaming = true;
        self
    }

    pub fn with_http(mut self, rule: HttpRule) -> Self {
        self.http = Some(rule);
        self
    }

    /// The binding used when the method carries no HTTP annotation:
    /// `POST /{package}.{Service}/{Method}` with the whole request as body
    pub fn default_rule(&self) -> HttpRule {
        let path = if self.service.is_empty() {
            format!("/{}", self.name)
        } else {
            format!("/{}/{}", self.service, self.name)
        };
        HttpRule::post(path).with_body("*")
    }

    /// The declared HTTP rule, or the default binding
    pub fn effective_rule(&self) -> HttpRule {
        self.http.clone().unwrap_or_else(|| self.default_rule())
    }
}

/// A service grouping RPC methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub name: String,
    pub package: Option<String>,
    pub methods: Vec<MethodDefinition>,
}

impl ServiceDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
            methods: Vec::new(),
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        let full_name = self.full_name();
        for method in &mut self.methods {
            method.service = full_name.clone();
        }
        self
    }

    pub fn with_method(mut self, mut method: MethodDefinition) -> Self {
        method.service = self.full_name();
        self.methods.push(method);
        self
    }

    pub fn with_methods(self, methods: impl IntoIterator<Item = MethodDefinition>) -> Self {
        methods
            .into_iter()
            .fold(self, |service, method| service.with_method(method))
    }

    /// `package.Service`, or just `Service` without a package
    pub fn full_name(&self) -> String {
        match &self.package {
            Some(package) if !package.is_empty() => format!("{}.{}", package, self.name),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_display_and_parse() {
        assert_eq!(format!("{}", Verb::Get), "GET");
        assert_eq!(format!("{}", Verb::Delete), "DELETE");
        assert_eq!("patch".parse::<Verb>().unwrap(), Verb::Patch);
        assert!(matches!(
            "HEAD".parse::<Verb>(),
            Err(SchemaError::UnsupportedVerb(_))
        ));
    }

    #[test]
    fn test_http_rule_builder() {
        let rule = HttpRule::post("/post/{a}").with_body("req");
        assert_eq!(rule.verb, Verb::Post);
        assert_eq!(rule.path, "/post/{a}");
        assert_eq!(rule.body, "req");
        assert!(HttpRule::get("/api").body.is_empty());
    }

    #[test]
    fn test_service_sets_method_owner() {
        let service = ServiceDefinition::new("CounterService")
            .with_method(MethodDefinition::new("Increment", TypeId(0), TypeId(1)))
            .with_package("main");
        assert_eq!(service.full_name(), "main.CounterService");
        assert_eq!(service.methods[0].service, "main.CounterService");
    }

    #[test]
    fn test_default_rule() {
        let service = ServiceDefinition::new("CounterService")
            .with_package("main")
            .with_method(MethodDefinition::new("Increment", TypeId(0), TypeId(1)));
        let rule = service.methods[0].effective_rule();
        assert_eq!(rule.verb, Verb::Post);
        assert_eq!(rule.path, "/main.CounterService/Increment");
        assert_eq!(rule.body, "*");
    }

    #[test]
    fn test_streaming_flags() {
        let method = MethodDefinition::new("StreamingIncrements", TypeId(0), TypeId(1)).server_streaming();
        assert!(method.server_streaming);
        assert!(!method.client_streaming);
    }
}
