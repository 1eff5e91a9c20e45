use std::collections::HashMap;
use std::sync::RwLock;

use crate::entities::{FieldChain, FieldPath, Schema, TypeId};
use crate::error::PlanError;

/// Resolves dotted field paths against the schema arena
///
/// Results, failures included, are cached per (root type, path). The cache
/// sits behind a `RwLock` so one resolver can serve several planning threads.
pub struct FieldResolver<'s> {
    schema: &'s Schema,
    cache: RwLock<HashMap<(TypeId, FieldPath), Result<FieldChain, PlanError>>>,
}

impl<'s> FieldResolver<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Resolve a dotted path such as `r_camel.name_camel`
    pub fn resolve_dotted(&self, root: TypeId, dotted: &str) -> Result<FieldChain, PlanError> {
        let path = FieldPath::parse(dotted).ok_or_else(|| PlanError::UnknownField {
            message: self.schema.type_name(root),
            field: dotted.to_string(),
            path: dotted.to_string(),
        })?;
        self.resolve(root, &path)
    }

    /// Walk `path` from `root`, one singular message hop per segment
    pub fn resolve(&self, root: TypeId, path: &FieldPath) -> Result<FieldChain, PlanError> {
        let key = (root, path.clone());
        if let Ok(cache) = self.cache.read() {
            if let Some(cached) = cache.get(&key) {
                return cached.clone();
            }
        }

        let resolved = self.walk(root, path);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, resolved.clone());
        }
        resolved
    }

    /// Like [`resolve`](Self::resolve), but the chain must end on a singular scalar
    pub fn resolve_scalar(&self, root: TypeId, path: &FieldPath) -> Result<FieldChain, PlanError> {
        let chain = self.resolve(root, path)?;
        if chain.leaf().kind.is_scalar() {
            Ok(chain)
        } else {
            Err(PlanError::ResolutionNotScalar {
                path: path.to_string(),
            })
        }
    }

    fn walk(&self, root: TypeId, path: &FieldPath) -> Result<FieldChain, PlanError> {
        let unknown = |message: String, field: &str| PlanError::UnknownField {
            message,
            field: field.to_string(),
            path: path.to_string(),
        };

        let mut fields = Vec::with_capacity(path.len());
        let mut current = Some(root);
        let mut owner = self.schema.type_name(root);

        for segment in path.segments() {
            let message = current
                .and_then(|id| self.schema.message(id))
                .ok_or_else(|| unknown(owner.clone(), segment.as_str()))?;
            let field = message
                .field(segment)
                .ok_or_else(|| unknown(message.full_name(), segment.as_str()))?;

            owner = format!("{}.{}", message.full_name(), field.name);
            current = field.kind.message_type();
            fields.push(field.clone());
        }

        let canonical = fields
            .iter()
            .fold(None::<FieldPath>, |acc, field| match acc {
                None => Some(FieldPath::root(field.name.as_str())),
                Some(parent) => Some(parent.child(field.name.as_str())),
            })
            .ok_or_else(|| unknown(owner.clone(), ""))?;

        Ok(FieldChain::new(root, canonical, fields))
    }
}
