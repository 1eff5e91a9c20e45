use crate::entities::{BindingPlan, Schema};
use crate::error::GeneratorError;

/// Trait for emission backends consuming binding plans
///
/// The `Output` type is what a generation run hands back, e.g. a JSON
/// document or the generated source files of a target language.
pub trait Emitter: Send + Sync {
    /// The type returned when the generation run completes
    type Output: Send;

    /// Render the successfully planned methods, in schema order
    fn emit(&self, schema: &Schema, plans: &[BindingPlan]) -> Result<Self::Output, GeneratorError>;
}
