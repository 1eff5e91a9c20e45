use serde_json::Value;

use super::{FieldDefinition, FieldPath, NamingPolicy, TypeId};

/// A resolved field access: the declared fields walked from the root type,
/// one per path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChain {
    root: TypeId,
    path: FieldPath,
    fields: Vec<FieldDefinition>,
}

impl FieldChain {
    /// `fields` holds one definition per segment of `path` and is never empty
    pub(crate) fn new(root: TypeId, path: FieldPath, fields: Vec<FieldDefinition>) -> Self {
        debug_assert!(!fields.is_empty() && fields.len() == path.len());
        Self { root, path, fields }
    }

    pub fn root(&self) -> TypeId {
        self.root
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// The field the chain ends on
    pub fn leaf(&self) -> &FieldDefinition {
        &self.fields[self.fields.len() - 1]
    }

    /// Dotted key under a naming policy, e.g. `zeroValueMsg.c`
    pub fn key(&self, naming: NamingPolicy) -> String {
        self.fields
            .iter()
            .map(|field| field.display_name(naming))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Walk a JSON request value along the chain. Each hop looks for the
    /// policy name first and the declared name second. `null` counts as absent.
    pub fn extract<'a>(&self, request: &'a Value, naming: NamingPolicy) -> Option<&'a Value> {
        self.fields.iter().try_fold(request, |current, field| {
            let object = current.as_object()?;
            object
                .get(&field.display_name(naming))
                .or_else(|| object.get(&field.name))
                .filter(|value| !value.is_null())
        })
    }
}
