use serde::Deserialize;

use super::NamingPolicy;
use crate::error::GeneratorError;

/// Options of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub naming: NamingPolicy,
    /// Omit `false`, `0` and `""` from query strings
    pub omit_zero: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::CamelCase,
            omit_zero: true,
        }
    }
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_omit_zero(mut self, omit_zero: bool) -> Self {
        self.omit_zero = omit_zero;
        self
    }

    /// Parse a plugin parameter string such as
    /// `use_proto_names=true,emit_unpopulated=true`
    pub fn from_parameter(parameter: &str) -> Result<Self, GeneratorError> {
        let mut options = Self::default();
        for pair in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, "true"));
            let flag = parse_flag(key, value)?;
            match key.trim() {
                "use_proto_names" => {
                    options.naming = if flag {
                        NamingPolicy::ProtoName
                    } else {
                        NamingPolicy::CamelCase
                    }
                }
                "emit_unpopulated" => options.omit_zero = !flag,
                other => {
                    return Err(GeneratorError::ConfigurationError(format!(
                        "unknown parameter `{}`",
                        other
                    )))
                }
            }
        }
        Ok(options)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, GeneratorError> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(GeneratorError::ConfigurationError(format!(
            "parameter `{}` expects true or false, got `{}`",
            key.trim(),
            other
        ))),
    }
}
