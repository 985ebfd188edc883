//! Field Validators
//!
//! Pure functions from a control's current value to a fault verdict. A control
//! carries a list of validators; they compose conjunctively and the control's
//! fault set is the union of their verdicts.
//!
//! Length and pattern checks skip empty values so that an empty control only
//! ever reports `required`.

use crate::error::FormError;
use crate::models::{FaultKind, FaultSet, ValidatorSpec};
use regex::Regex;
use serde_json::Value;

/// Compiled validator ready to run against a value
#[derive(Debug, Clone)]
pub enum Validator {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Pattern { source: String, regex: Regex },
    Range { min: f64, max: f64 },
}

impl Validator {
    /// Compile a declarative spec
    ///
    /// Patterns are anchored so the whole value must match.
    pub fn compile(spec: &ValidatorSpec) -> Result<Self, FormError> {
        Ok(match spec {
            ValidatorSpec::Required => Self::Required,
            ValidatorSpec::MinLength { value } => Self::MinLength(*value),
            ValidatorSpec::MaxLength { value } => Self::MaxLength(*value),
            ValidatorSpec::Pattern { pattern } => {
                let regex = Regex::new(&format!("^(?:{})$", pattern))
                    .map_err(|e| FormError::invalid_pattern(pattern.clone(), e))?;
                Self::Pattern {
                    source: pattern.clone(),
                    regex,
                }
            }
            ValidatorSpec::Range { min, max } => Self::Range {
                min: *min,
                max: *max,
            },
        })
    }

    pub fn compile_all(specs: &[ValidatorSpec]) -> Result<Vec<Self>, FormError> {
        specs.iter().map(Self::compile).collect()
    }

    /// Fault kind this validator reports
    pub fn kind(&self) -> FaultKind {
        match self {
            Self::Required => FaultKind::Required,
            Self::MinLength(_) => FaultKind::MinLength,
            Self::MaxLength(_) => FaultKind::MaxLength,
            Self::Pattern { .. } => FaultKind::Pattern,
            Self::Range { .. } => FaultKind::Range,
        }
    }

    /// Spec this validator was compiled from
    pub fn spec(&self) -> ValidatorSpec {
        match self {
            Self::Required => ValidatorSpec::Required,
            Self::MinLength(n) => ValidatorSpec::MinLength { value: *n },
            Self::MaxLength(n) => ValidatorSpec::MaxLength { value: *n },
            Self::Pattern { source, .. } => ValidatorSpec::Pattern {
                pattern: source.clone(),
            },
            Self::Range { min, max } => ValidatorSpec::Range {
                min: *min,
                max: *max,
            },
        }
    }

    /// Run against a value; `Some(kind)` when the value violates the rule
    pub fn validate(&self, value: &Value) -> Option<FaultKind> {
        let faulty = match self {
            Self::Required => is_empty_input(value),
            Self::MinLength(min) => {
                !is_empty_input(value) && input_length(value).is_some_and(|len| len < *min)
            }
            Self::MaxLength(max) => {
                !is_empty_input(value) && input_length(value).is_some_and(|len| len > *max)
            }
            Self::Pattern { regex, .. } => match value {
                _ if is_empty_input(value) => false,
                Value::String(s) => !regex.is_match(s),
                other => !regex.is_match(&other.to_string()),
            },
            Self::Range { min, max } => {
                if is_absent(value) {
                    false
                } else {
                    match numeric_value(value) {
                        Some(n) => n < *min || n > *max,
                        None => true,
                    }
                }
            }
        };

        faulty.then(|| self.kind())
    }
}

/// Union of all validator verdicts for a value
pub fn validate_all(validators: &[Validator], value: &Value) -> FaultSet {
    validators.iter().filter_map(|v| v.validate(value)).collect()
}

/// Null, empty string or empty array
pub fn is_empty_input(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Only an undefined (null) value is absent for range purposes
fn is_absent(value: &Value) -> bool {
    value.is_null()
}

/// Numeric reading of a value; numeric strings are coerced
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn input_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}
