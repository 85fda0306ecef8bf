//! Build-time checks and per-invocation input validation.

use crate::error::BuildError;
use crate::schema::InputSchema;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Validator};
use serde_json::Value;
use std::fmt;

/// Prefix of every validation failure message
pub const VALIDATION_PREFIX: &str = "Validation error";

/// Message used when the validator reports no structured violations
pub const GENERIC_VALIDATION_MESSAGE: &str = "Validation error: input does not match schema";

/// Path label for violations on the input as a whole
pub const ROOT_PATH: &str = "(root)";

/// Validate tool name: non-empty, no whitespace
///
/// # Errors
///
/// Returns error if the name is unusable as a registry key
pub fn validate_name(name: &str) -> Result<(), BuildError> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(BuildError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// One violated field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dot-separated path into the input, or [`ROOT_PATH`]
    pub path: String,
    /// Validator message
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found in one input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationFailure {
    /// Violations in validator order
    pub violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    /// Failure with a single violation
    #[must_use]
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                path: path.into(),
                message: message.into(),
            }],
        }
    }

    /// Paths of all violations
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.path.as_str())
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return f.write_str(GENERIC_VALIDATION_MESSAGE);
        }
        let joined = self
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{VALIDATION_PREFIX}: {joined}")
    }
}

/// Compiled input validator.
///
/// Compiled once when a contract is built.
pub struct InputValidator {
    compiled: Validator,
}

impl InputValidator {
    /// Compile `schema` for `tool`
    ///
    /// # Errors
    ///
    /// Returns error if the schema is not valid JSON Schema
    pub fn compile(tool: &str, schema: &InputSchema) -> Result<Self, BuildError> {
        let compiled = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(schema.as_value())
            .map_err(|e| BuildError::InvalidSchema {
                tool: tool.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { compiled })
    }

    /// Check `input` and collect every violation.
    ///
    /// # Errors
    ///
    /// Returns the collected violations if the input does not conform
    pub fn validate(&self, input: &Value) -> Result<(), ValidationFailure> {
        let violations: Vec<FieldViolation> = self
            .compiled
            .iter_errors(input)
            .map(|err| {
                let pointer = err.instance_path.to_string();
                let path = match &err.kind {
                    ValidationErrorKind::Required { property } if pointer.is_empty() => property
                        .as_str()
                        .map_or_else(|| property.to_string(), str::to_string),
                    ValidationErrorKind::Required { property } => {
                        let field = property
                            .as_str()
                            .map_or_else(|| property.to_string(), str::to_string);
                        format!("{}.{field}", dotted_path(&pointer))
                    }
                    _ => dotted_path(&pointer),
                };
                FieldViolation {
                    path,
                    message: err.to_string(),
                }
            })
            .collect();

        if violations.is_empty() && !self.compiled.is_valid(input) {
            return Err(ValidationFailure::default());
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure { violations })
        }
    }
}

impl fmt::Debug for InputValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputValidator").finish_non_exhaustive()
    }
}

/// `/items/0/name` becomes `items.0.name`; the empty pointer is [`ROOT_PATH`].
fn dotted_path(pointer: &str) -> String {
    let segments: Vec<String> = pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect();
    if segments.is_empty() {
        ROOT_PATH.to_string()
    } else {
        segments.join(".")
    }
}
