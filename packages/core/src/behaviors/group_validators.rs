//! Cross-Field Validators
//!
//! Group-level checks that read several sibling controls and attach their
//! verdict to the group itself, not to either child.

use crate::models::{FaultKind, FaultSet, FieldControl, FormNode, GroupValidatorSpec};

#[derive(Debug, Clone, PartialEq)]
pub enum GroupValidator {
    /// Two sibling controls must hold exactly equal values
    ///
    /// Suppressed while either control is pristine, so a mismatch is not
    /// reported before the user has typed into both.
    FieldsMatch { left: String, right: String },
}

impl GroupValidator {
    pub fn compile(spec: &GroupValidatorSpec) -> Self {
        match spec {
            GroupValidatorSpec::FieldsMatch { left, right } => Self::FieldsMatch {
                left: left.clone(),
                right: right.clone(),
            },
        }
    }

    pub fn compile_all(specs: &[GroupValidatorSpec]) -> Vec<Self> {
        specs.iter().map(Self::compile).collect()
    }

    pub fn spec(&self) -> GroupValidatorSpec {
        match self {
            Self::FieldsMatch { left, right } => GroupValidatorSpec::FieldsMatch {
                left: left.clone(),
                right: right.clone(),
            },
        }
    }

    pub fn validate(&self, children: &[(String, FormNode)]) -> Option<FaultKind> {
        match self {
            Self::FieldsMatch { left, right } => {
                let (left, right) = (control(children, left)?, control(children, right)?);
                if left.is_pristine() || right.is_pristine() {
                    return None;
                }
                (left.value() != right.value()).then_some(FaultKind::Match)
            }
        }
    }
}

pub fn validate_group(validators: &[GroupValidator], children: &[(String, FormNode)]) -> FaultSet {
    validators
        .iter()
        .filter_map(|v| v.validate(children))
        .collect()
}

fn control<'a>(children: &'a [(String, FormNode)], name: &str) -> Option<&'a FieldControl> {
    children
        .iter()
        .find(|(child_name, _)| child_name == name)
        .and_then(|(_, node)| node.as_field())
}
