//! Validation Messages
//!
//! Turns a control's fault set into human-readable text using an immutable
//! fault → message table. Tables are plain values handed to whoever renders
//! messages; there is no global lookup.

use crate::models::{FaultKind, FaultSet, FieldControl};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const EMAIL_REQUIRED_MESSAGE: &str = "Please enter your email address.";
pub const EMAIL_PATTERN_MESSAGE: &str = "Please enter a valid email address.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTable {
    messages: BTreeMap<FaultKind, String>,
}

impl MessageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: FaultKind, message: impl Into<String>) -> Self {
        self.messages.insert(kind, message.into());
        self
    }

    /// Messages shown under the email field
    pub fn email_defaults() -> Self {
        Self::new()
            .with(FaultKind::Required, EMAIL_REQUIRED_MESSAGE)
            .with(FaultKind::Pattern, EMAIL_PATTERN_MESSAGE)
    }

    pub fn get(&self, kind: FaultKind) -> Option<&str> {
        self.messages.get(&kind).map(String::as_str)
    }

    /// Join the messages of every fault that has one, separated by a space.
    /// Faults without an entry are skipped.
    pub fn render(&self, faults: &FaultSet) -> String {
        faults
            .iter()
            .filter_map(|kind| self.get(kind))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// User-facing message for a control
///
/// Empty unless the control has been touched or dirtied and currently has
/// faults.
pub fn get_message(control: &FieldControl, table: &MessageTable) -> String {
    if (control.is_touched() || control.is_dirty()) && !control.faults().is_empty() {
        table.render(control.faults())
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::Validator;
    use crate::models::ValidatorSpec;
    use serde_json::json;

    fn email_control() -> FieldControl {
        let validators = Validator::compile_all(&[
            ValidatorSpec::Required,
            ValidatorSpec::Pattern {
                pattern: "[a-z0-9._%+-]+@[a-z0-9.-]+".to_string(),
            },
            ValidatorSpec::MinLength { value: 20 },
        ])
        .unwrap();
        FieldControl::new(json!(""), validators)
    }

    #[test]
    fn test_render_skips_unknown_faults() {
        let table = MessageTable::email_defaults();
        let faults: FaultSet = [FaultKind::Pattern, FaultKind::MinLength].into_iter().collect();
        assert_eq!(table.render(&faults), EMAIL_PATTERN_MESSAGE);
        assert_eq!(table.render(&FaultSet::new()), "");
    }

    #[test]
    fn test_render_joins_with_single_space() {
        let table = MessageTable::new()
            .with(FaultKind::Required, "A.")
            .with(FaultKind::Range, "B.");
        let faults: FaultSet = [FaultKind::Range, FaultKind::Required].into_iter().collect();
        assert_eq!(table.render(&faults), "A. B.");
    }

    #[test]
    fn test_message_requires_interaction() {
        let table = MessageTable::email_defaults();
        let mut control = email_control();

        // Faulty but untouched and pristine
        assert_eq!(get_message(&control, &table), "");

        control.mark_touched();
        assert_eq!(get_message(&control, &table), EMAIL_REQUIRED_MESSAGE);

        control.set_value(json!("jonny@mail.ru"), true);
        assert_eq!(get_message(&control, &table), "");

        control.set_value(json!("nope"), true);
        assert_eq!(get_message(&control, &table), EMAIL_PATTERN_MESSAGE);
    }

    #[test]
    fn test_table_serializes_by_fault_name() {
        let json = serde_json::to_value(MessageTable::email_defaults()).unwrap();
        assert_eq!(json["required"], EMAIL_REQUIRED_MESSAGE);
        assert_eq!(json["pattern"], EMAIL_PATTERN_MESSAGE);
    }
}
