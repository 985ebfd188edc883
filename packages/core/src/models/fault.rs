//! Fault Kinds
//!
//! A fault is a named category of validation failure attached to a node of the
//! form tree. Faults are data: they are recomputed on every value change and
//! never abort an operation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Named category of validation failure
///
/// Serialized in lowercase (`"required"`, `"minlength"`, ...), which is also the
/// key used by message tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultKind {
    /// Value is missing (null, empty string, empty array)
    Required,
    /// String shorter than the configured minimum
    MinLength,
    /// String longer than the configured maximum
    MaxLength,
    /// Value does not fully match the configured pattern
    Pattern,
    /// Value is non-numeric or outside the configured bounds
    Range,
    /// Two sibling fields that must agree do not
    Match,
}

impl FaultKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength => "minlength",
            Self::MaxLength => "maxlength",
            Self::Pattern => "pattern",
            Self::Range => "range",
            Self::Match => "match",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaultKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" => Ok(Self::Required),
            "minlength" => Ok(Self::MinLength),
            "maxlength" => Ok(Self::MaxLength),
            "pattern" => Ok(Self::Pattern),
            "range" => Ok(Self::Range),
            "match" => Ok(Self::Match),
            _ => Err(format!("Unknown fault kind: {}", s)),
        }
    }
}

/// The set of faults currently active on a node. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaultSet(BTreeSet<FaultKind>);

impl FaultSet {
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, kind: FaultKind) -> bool {
        self.0.insert(kind)
    }

    pub fn contains(&self, kind: FaultKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate faults in declaration order of [`FaultKind`]
    pub fn iter(&self) -> impl Iterator<Item = FaultKind> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<FaultKind> for FaultSet {
    fn from_iter<I: IntoIterator<Item = FaultKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<FaultKind> for FaultSet {
    fn extend<I: IntoIterator<Item = FaultKind>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl fmt::Display for FaultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|k| k.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_kind_round_trips_through_str() {
        for kind in [
            FaultKind::Required,
            FaultKind::MinLength,
            FaultKind::MaxLength,
            FaultKind::Pattern,
            FaultKind::Range,
            FaultKind::Match,
        ] {
            assert_eq!(kind.as_str().parse::<FaultKind>().unwrap(), kind);
        }
        assert!("bogus".parse::<FaultKind>().is_err());
    }

    #[test]
    fn test_fault_set_serializes_as_sorted_list() {
        let faults: FaultSet = [FaultKind::Pattern, FaultKind::Required].into_iter().collect();
        let json = serde_json::to_value(&faults).unwrap();
        assert_eq!(json, serde_json::json!(["required", "pattern"]));
        assert_eq!(faults.to_string(), "[required, pattern]");
    }
}
