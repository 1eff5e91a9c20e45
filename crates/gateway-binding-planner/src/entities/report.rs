use crate::error::PlanError;

/// A method whose binding could not be planned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodFailure {
    pub service: String,
    pub method: String,
    pub error: PlanError,
}

impl std::fmt::Display for MethodFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}: {}", self.service, self.method, self.error)
    }
}

/// Outcome of a generation run: the emitter output for every planned
/// method plus the methods that failed
#[derive(Debug)]
pub struct GenerationReport<O> {
    pub output: O,
    pub failures: Vec<MethodFailure>,
}

impl<O> GenerationReport<O> {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
