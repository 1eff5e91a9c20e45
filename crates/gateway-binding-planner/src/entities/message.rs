use serde::Serialize;

use super::{NamingPolicy, TypeId};

/// Scalar kinds a field can carry on the JSON wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,
    Number,
    Boolean,
    /// Base64 text on the wire
    Bytes,
    /// Enum value name on the wire
    Enum,
}

/// Element type of a repeated field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Scalar(ScalarKind),
    Message(TypeId),
}

/// The kind of a field, resolved once when the schema is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Message(TypeId),
    Repeated(Element),
    /// map<string, string>
    Map,
}

impl FieldKind {
    /// True for singular scalar fields only
    pub fn is_scalar(&self) -> bool {
        matches!(self, FieldKind::Scalar(_))
    }

    /// The nested message type of a singular message field
    pub fn message_type(&self) -> Option<TypeId> {
        match self {
            FieldKind::Message(id) => Some(*id),
            _ => None,
        }
    }

    pub(crate) fn referenced_type(&self) -> Option<TypeId> {
        match self {
            FieldKind::Message(id) | FieldKind::Repeated(Element::Message(id)) => Some(*id),
            _ => None,
        }
    }
}

/// A field declared on a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Declared wire name (snake_case)
    pub name: String,
    pub kind: FieldKind,
    /// Explicit `json_name` override, used by the camelCase policy
    pub json_name: Option<String>,
    /// Index of the oneof group of the owning message this field belongs to
    pub oneof: Option<usize>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            json_name: None,
            oneof: None,
        }
    }

    pub fn scalar(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self::new(name, FieldKind::Scalar(kind))
    }

    pub fn message(name: impl Into<String>, type_id: TypeId) -> Self {
        Self::new(name, FieldKind::Message(type_id))
    }

    pub fn repeated(name: impl Into<String>, element: Element) -> Self {
        Self::new(name, FieldKind::Repeated(element))
    }

    pub fn map(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Map)
    }

    pub fn with_json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = Some(json_name.into());
        self
    }

    /// Make the field a member of the owner's oneof group `index`
    pub fn in_oneof(mut self, index: usize) -> Self {
        self.oneof = Some(index);
        self
    }

    /// Name of the field under the given naming policy
    pub fn display_name(&self, naming: NamingPolicy) -> String {
        match (naming, &self.json_name) {
            (NamingPolicy::CamelCase, Some(json_name)) => json_name.clone(),
            _ => naming.apply(&self.name),
        }
    }
}

/// A message type held in the schema arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageType {
    pub name: String,
    /// Schema file declaring the message
    pub file: String,
    /// `None` for messages declared in a file without a package
    pub package: Option<String>,
    pub fields: Vec<FieldDefinition>,
    /// Declared oneof names, addressed by [`FieldDefinition::oneof`]
    pub oneofs: Vec<String>,
}

impl MessageType {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            package: None,
            fields: Vec::new(),
            oneofs: Vec::new(),
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDefinition>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Declare a oneof group; its index is the number of groups declared before it
    pub fn with_oneof(mut self, name: impl Into<String>) -> Self {
        self.oneofs.push(name.into());
        self
    }

    /// Fields that belong to no oneof group
    pub fn non_oneof_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|field| field.oneof.is_none())
    }

    /// Oneof groups in declaration order with their member fields
    pub fn oneof_groups(&self) -> impl Iterator<Item = (&str, Vec<&FieldDefinition>)> {
        self.oneofs.iter().enumerate().map(move |(index, name)| {
            let members = self
                .fields
                .iter()
                .filter(|field| field.oneof == Some(index))
                .collect();
            (name.as_str(), members)
        })
    }

    /// Look a field up by declared name, falling back to its camelCase name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|f| f.display_name(NamingPolicy::CamelCase) == name)
            })
    }

    /// `package.Name`, or just `Name` without a package
    pub fn qualified_name(&self) -> String {
        match &self.package {
            Some(package) if !package.is_empty() => format!("{}.{}", package, self.name),
            _ => self.name.clone(),
        }
    }

    /// Fully qualified name with the leading dot, e.g. `.main.PostRequest`
    pub fn full_name(&self) -> String {
        format!(".{}", self.qualified_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_uses_json_override() {
        let field = FieldDefinition::scalar("req_camel", ScalarKind::String).with_json_name("reqC");
        assert_eq!(field.display_name(NamingPolicy::CamelCase), "reqC");
        assert_eq!(field.display_name(NamingPolicy::ProtoName), "req_camel");
    }

    #[test]
    fn test_field_lookup_by_declared_and_camel_name() {
        let message = MessageType::new("HttpGetRequest", "service.proto")
            .with_field(FieldDefinition::scalar("num_to_increase", ScalarKind::Number));
        assert!(message.field("num_to_increase").is_some());
        assert!(message.field("numToIncrease").is_some());
        assert!(message.field("missing").is_none());
    }

    #[test]
    fn test_oneof_groups() {
        let message = MessageType::new("FetchLogRequest", "log.proto")
            .with_oneof("source_detail")
            .with_fields([
                FieldDefinition::scalar("source", ScalarKind::Enum),
                FieldDefinition::scalar("service", ScalarKind::String).in_oneof(0),
                FieldDefinition::scalar("application", ScalarKind::String).in_oneof(0),
            ]);

        let plain: Vec<&str> = message.non_oneof_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(plain, vec!["source"]);

        let groups: Vec<(&str, Vec<&str>)> = message
            .oneof_groups()
            .map(|(name, members)| (name, members.iter().map(|f| f.name.as_str()).collect()))
            .collect();
        assert_eq!(groups, vec![("source_detail", vec!["service", "application"])]);
    }

    #[test]
    fn test_message_names() {
        let message = MessageType::new("PostRequest", "service.proto").with_package("main");
        assert_eq!(message.qualified_name(), "main.PostRequest");
        assert_eq!(message.full_name(), ".main.PostRequest");

        let external = MessageType::new("ExternalMessage", "msg.proto");
        assert_eq!(external.full_name(), ".ExternalMessage");
    }

    #[test]
    fn test_field_kind_helpers() {
        assert!(FieldKind::Scalar(ScalarKind::Boolean).is_scalar());
        assert!(!FieldKind::Map.is_scalar());
        assert!(!FieldKind::Repeated(Element::Scalar(ScalarKind::Number)).is_scalar());
        assert_eq!(FieldKind::Message(TypeId(3)).message_type(), Some(TypeId(3)));
        assert_eq!(FieldKind::Repeated(Element::Message(TypeId(3))).message_type(), None);
    }
}
