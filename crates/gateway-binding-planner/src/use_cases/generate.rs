use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use super::plan_binding::Planner;
use super::ports::Emitter;
use crate::entities::{GenerationReport, GeneratorOptions, MethodDefinition, MethodFailure, Schema};
use crate::error::GeneratorError;

/// Builder for a generation run with a fluent API
///
/// # Example
///
/// ```rust
/// use gateway_binding_planner::prelude::*;
///
/// let mut builder = Schema::builder();
/// let request = builder.message(MessageType::new("PostRequest", "service.proto").with_package("main"));
/// builder.field(request, FieldDefinition::scalar("a", ScalarKind::Number));
/// builder.service(
///     ServiceDefinition::new("CounterService")
///         .with_package("main")
///         .with_method(
///             MethodDefinition::new("Post", request, request)
///                 .with_http(HttpRule::post("/post/{a}").with_body("*")),
///         ),
/// );
/// let schema = builder.build()?;
///
/// let report = GenerationBuilder::new()
///     .schema(&schema)
///     .options(GeneratorOptions::default())
///     .emitter(DefaultEmitter)
///     .build()
///     .execute()?;
///
/// assert!(report.is_complete());
/// assert_eq!(report.output[0].path_template(), "/post/{a}");
/// # Ok::<(), GeneratorError>(())
/// ```
pub struct GenerationBuilder<S, E> {
    schema: S,
    options: GeneratorOptions,
    emitter: E,
}

impl GenerationBuilder<(), ()> {
    /// Create a new generation builder
    pub fn new() -> Self {
        Self {
            schema: (),
            options: GeneratorOptions::default(),
            emitter: (),
        }
    }
}

impl Default for GenerationBuilder<(), ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, E> GenerationBuilder<S, E> {
    /// Set the schema to generate from
    pub fn schema<'s>(self, schema: &'s Schema) -> GenerationBuilder<&'s Schema, E> {
        GenerationBuilder {
            schema,
            options: self.options,
            emitter: self.emitter,
        }
    }

    /// Set the emission backend
    pub fn emitter<NewE: Emitter>(self, emitter: NewE) -> GenerationBuilder<S, NewE> {
        GenerationBuilder {
            schema: self.schema,
            options: self.options,
            emitter,
        }
    }

    pub fn options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }
}

impl<'s, E: Emitter> GenerationBuilder<&'s Schema, E> {
    /// Build the generation run
    pub fn build(self) -> Generation<'s, E> {
        Generation {
            schema: self.schema,
            options: self.options,
            emitter: self.emitter,
        }
    }

    /// Execute the run directly from the builder
    pub fn execute(self) -> Result<GenerationReport<E::Output>, GeneratorError> {
        self.build().execute()
    }
}

/// A configured generation run
pub struct Generation<'s, E> {
    schema: &'s Schema,
    options: GeneratorOptions,
    emitter: E,
}

impl<'s, E: Emitter> Generation<'s, E> {
    /// Plan every method of the schema and hand the plans to the emitter.
    ///
    /// Methods are planned in parallel; plans reach the emitter in schema
    /// order. A method that fails to plan is reported in
    /// [`GenerationReport::failures`] and does not stop the run. Client
    /// streaming methods cannot be called through the gateway and are skipped.
    #[instrument(skip_all, fields(services = self.schema.services().len()))]
    pub fn execute(self) -> Result<GenerationReport<E::Output>, GeneratorError> {
        let planner = Planner::new(self.schema, self.options);

        let methods: Vec<&MethodDefinition> = self
            .schema
            .services()
            .iter()
            .flat_map(|service| service.methods.iter())
            .filter(|method| {
                if method.client_streaming {
                    debug!(
                        service = %method.service,
                        method = %method.name,
                        "skipping client streaming method"
                    );
                }
                !method.client_streaming
            })
            .collect();

        let outcomes: Vec<_> = methods
            .par_iter()
            .map(|method| {
                planner.plan(method).map_err(|error| MethodFailure {
                    service: method.service.clone(),
                    method: method.name.clone(),
                    error,
                })
            })
            .collect();

        let mut plans = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(plan) => plans.push(plan),
                Err(failure) => {
                    warn!(%failure, "method binding could not be planned");
                    failures.push(failure);
                }
            }
        }

        let output = self.emitter.emit(self.schema, &plans)?;
        info!(
            planned = plans.len(),
            failed = failures.len(),
            "generation finished"
        );

        Ok(GenerationReport { output, failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefaultEmitter;

    #[test]
    fn test_generation_builder() {
        let _builder = GenerationBuilder::new();
    }

    #[test]
    fn test_generation_builder_with_options() {
        let options = GeneratorOptions::default().with_omit_zero(false);
        let builder = GenerationBuilder::new().options(options);
        assert!(!builder.options.omit_zero);
    }

    #[test]
    fn test_empty_schema_generates_nothing() {
        let schema = Schema::builder().build().unwrap();
        let report = GenerationBuilder::new()
            .schema(&schema)
            .emitter(DefaultEmitter)
            .execute()
            .unwrap();
        assert!(report.output.is_empty());
        assert!(report.is_complete());
    }
}
