use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::{FieldDefinition, FieldKind, MessageType, ServiceDefinition};
use crate::error::SchemaError;

/// Stable identity of a message type inside a [`Schema`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only schema model: message arena, services and the import table
/// used to resolve type names across files.
///
/// Messages are addressed by [`TypeId`], so back references between
/// messages (A holds B holds A) and messages declared in files without a
/// package need no name matching once the schema is built.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    messages: Vec<MessageType>,
    services: Vec<ServiceDefinition>,
    imports: HashMap<String, Vec<String>>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn message(&self, id: TypeId) -> Option<&MessageType> {
        self.messages.get(id.0)
    }

    pub fn messages(&self) -> impl Iterator<Item = (TypeId, &MessageType)> {
        self.messages
            .iter()
            .enumerate()
            .map(|(index, message)| (TypeId(index), message))
    }

    pub fn services(&self) -> &[ServiceDefinition] {
        &self.services
    }

    /// Fully qualified type name, used in diagnostics and emitted documents
    pub fn type_name(&self, id: TypeId) -> String {
        self.message(id)
            .map(MessageType::full_name)
            .unwrap_or_else(|| id.to_string())
    }

    /// Resolve a type name as seen from `from_file`.
    ///
    /// Only the file itself and the files it imports are visible. A name
    /// declared by several visible files is ambiguous unless exactly one
    /// candidate lives in `from_file`.
    pub fn lookup(&self, from_file: &str, name: &str) -> Result<TypeId, SchemaError> {
        lookup(&self.messages, &self.imports, from_file, name)
    }
}

/// Builder for a [`Schema`]
///
/// Messages are declared first to obtain their [`TypeId`]; fields may then
/// reference any declared type, including types declared later.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    messages: Vec<MessageType>,
    pending_fields: Vec<(TypeId, FieldDefinition)>,
    services: Vec<ServiceDefinition>,
    imports: HashMap<String, Vec<String>>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a message and return its identity
    pub fn message(&mut self, message: MessageType) -> TypeId {
        self.messages.push(message);
        TypeId(self.messages.len() - 1)
    }

    /// Add a field to a declared message
    pub fn field(&mut self, owner: TypeId, field: FieldDefinition) -> &mut Self {
        self.pending_fields.push((owner, field));
        self
    }

    pub fn fields(
        &mut self,
        owner: TypeId,
        fields: impl IntoIterator<Item = FieldDefinition>,
    ) -> &mut Self {
        self.pending_fields
            .extend(fields.into_iter().map(|field| (owner, field)));
        self
    }

    /// Record that `file` imports `imported`
    pub fn import(&mut self, file: impl Into<String>, imported: impl Into<String>) -> &mut Self {
        self.imports
            .entry(file.into())
            .or_default()
            .push(imported.into());
        self
    }

    pub fn service(&mut self, service: ServiceDefinition) -> &mut Self {
        self.services.push(service);
        self
    }

    /// Resolve a type name against the messages declared so far
    pub fn lookup(&self, from_file: &str, name: &str) -> Result<TypeId, SchemaError> {
        lookup(&self.messages, &self.imports, from_file, name)
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let SchemaBuilder {
            mut messages,
            pending_fields,
            services,
            imports,
        } = self;

        for (owner, field) in pending_fields {
            let message = messages.get_mut(owner.0).ok_or_else(|| {
                SchemaError::DanglingType(format!("owner {} of field `{}`", owner, field.name))
            })?;
            message.fields.push(field);
        }

        for message in &messages {
            let mut names = HashSet::new();
            for field in &message.fields {
                if !names.insert(field.name.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        message: message.full_name(),
                        field: field.name.clone(),
                    });
                }
                if let Some(index) = field.oneof {
                    let reason = if index >= message.oneofs.len() {
                        Some(format!("oneof #{} is not declared", index))
                    } else if matches!(field.kind, FieldKind::Repeated(_) | FieldKind::Map) {
                        Some("repeated and map fields cannot be oneof members".to_string())
                    } else {
                        None
                    };
                    if let Some(reason) = reason {
                        return Err(SchemaError::InvalidOneof {
                            message: message.full_name(),
                            field: field.name.clone(),
                            reason,
                        });
                    }
                }
                if let Some(id) = field.kind.referenced_type() {
                    if id.0 >= messages.len() {
                        return Err(SchemaError::DanglingType(format!(
                            "{} referenced by `{}.{}`",
                            id,
                            message.full_name(),
                            field.name
                        )));
                    }
                }
            }
        }

        for service in &services {
            for method in &service.methods {
                for id in [method.request, method.response] {
                    if id.0 >= messages.len() {
                        return Err(SchemaError::DanglingType(format!(
                            "{} referenced by method `{}/{}`",
                            id,
                            service.full_name(),
                            method.name
                        )));
                    }
                }
            }
        }

        Ok(Schema {
            messages,
            services,
            imports,
        })
    }
}

fn lookup(
    messages: &[MessageType],
    imports: &HashMap<String, Vec<String>>,
    from_file: &str,
    name: &str,
) -> Result<TypeId, SchemaError> {
    let visible = |file: &str| {
        file == from_file
            || imports
                .get(from_file)
                .is_some_and(|imported| imported.iter().any(|i| i == file))
    };
    let named = |message: &MessageType| match name.strip_prefix('.') {
        Some(_) => message.full_name() == name,
        None => message.qualified_name() == name || message.name == name,
    };

    let candidates: Vec<usize> = messages
        .iter()
        .enumerate()
        .filter(|(_, message)| visible(message.file.as_str()) && named(*message))
        .map(|(index, _)| index)
        .collect();

    match candidates.as_slice() {
        [] => Err(SchemaError::UnknownType {
            name: name.to_string(),
            file: from_file.to_string(),
        }),
        [only] => Ok(TypeId(*only)),
        many => {
            let local: Vec<&usize> = many
                .iter()
                .filter(|index| messages[**index].file == from_file)
                .collect();
            match local.as_slice() {
                [only] => Ok(TypeId(**only)),
                _ => Err(SchemaError::AmbiguousType {
                    name: name.to_string(),
                    file: from_file.to_string(),
                    candidates: many.iter().map(|index| messages[*index].file.clone()).collect(),
                }),
            }
        }
    }
}
