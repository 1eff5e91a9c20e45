use thiserror::Error;

/// Errors raised while planning the binding of a single method
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Malformed template `{template}`: {reason}")]
    MalformedTemplate { template: String, reason: String },

    #[error("Unknown field `{field}` on message {message} while resolving `{path}`")]
    UnknownField {
        message: String,
        field: String,
        path: String,
    },

    #[error("Field path `{path}` does not resolve to a scalar field")]
    ResolutionNotScalar { path: String },

    #[error("Conflicting binding: {0}")]
    ConflictingBinding(String),
}

/// Errors raised while building or querying the schema model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unknown type `{name}` referenced from {file}")]
    UnknownType { name: String, file: String },

    #[error("Ambiguous type `{name}` referenced from {file}, declared in {candidates:?}")]
    AmbiguousType {
        name: String,
        file: String,
        candidates: Vec<String>,
    },

    #[error("Duplicate field `{field}` on message {message}")]
    DuplicateField { message: String, field: String },

    #[error("Dangling type reference: {0}")]
    DanglingType(String),

    #[error("Invalid oneof membership of `{field}` on message {message}: {reason}")]
    InvalidOneof {
        message: String,
        field: String,
        reason: String,
    },

    #[error("Unsupported HTTP verb: {0}")]
    UnsupportedVerb(String),
}

/// Errors raised while applying a binding plan to a request value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Missing value for path parameter `{0}`")]
    MissingPathParameter(String),

    #[error("Path parameter `{0}` is not a scalar value")]
    InvalidPathParameter(String),

    #[error("Oneof `{group}` has several members set: {fields:?}")]
    ConflictingOneof { group: String, fields: Vec<String> },
}

/// Top level errors of a generation run
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaError),

    #[error("Render error: {0}")]
    RenderError(#[from] RenderError),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Emit error: {0}")]
    EmitError(String),
}
