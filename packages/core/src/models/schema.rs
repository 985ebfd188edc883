//! Form Schema Types
//!
//! Declarative description of a form: fields, nesting, list item templates,
//! initial values and validator specs. A schema is plain data (serde) and is
//! compiled into a live [`FormNode`](crate::models::FormNode) tree at mount.
//!
//! ## Example Schema
//!
//! ```json
//! {
//!   "id": "customer",
//!   "version": 1,
//!   "description": "Customer signup",
//!   "fields": [
//!     {
//!       "name": "firstName",
//!       "kind": "control",
//!       "default": "",
//!       "validators": [{ "type": "required" }, { "type": "minLength", "value": 3 }]
//!     },
//!     {
//!       "name": "emailGroup",
//!       "kind": "group",
//!       "fields": [
//!         { "name": "email", "kind": "control", "default": "" },
//!         { "name": "confirmEmail", "kind": "control", "default": "" }
//!       ],
//!       "validators": [{ "type": "fieldsMatch", "left": "email", "right": "confirmEmail" }]
//!     }
//!   ]
//! }
//! ```

use crate::error::FormError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Validator attached to a single control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ValidatorSpec {
    Required,
    MinLength { value: usize },
    MaxLength { value: usize },
    /// Full-match pattern (anchored at both ends when compiled)
    Pattern { pattern: String },
    /// Inclusive numeric bounds; an absent value is not a fault
    Range { min: f64, max: f64 },
}

/// Validator attached to a group, reading several children at once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GroupValidatorSpec {
    /// `left` and `right` must hold equal values once both are dirty
    FieldsMatch { left: String, right: String },
}

/// Shape of a schema field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldKind {
    /// Leaf holding a single value
    Control {
        #[serde(default)]
        default: Value,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        validators: Vec<ValidatorSpec>,
    },

    /// Named children plus group-level validators (RECURSIVE)
    Group {
        fields: Vec<SchemaField>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        validators: Vec<GroupValidatorSpec>,
    },

    /// Ordered list of groups, each built from `item_fields`
    List {
        item_fields: Vec<SchemaField>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        item_validators: Vec<GroupValidatorSpec>,
        /// Number of items created at mount
        #[serde(default = "default_initial_items")]
        initial_items: usize,
    },
}

fn default_initial_items() -> usize {
    1
}

/// A single named field in a schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Field name (unique among siblings, no dots)
    pub name: String,

    #[serde(flatten)]
    pub kind: FieldKind,

    /// Human-readable description of the field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaField {
    pub fn control(name: impl Into<String>, default: Value, validators: Vec<ValidatorSpec>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Control {
                default,
                validators,
            },
            description: None,
        }
    }

    pub fn group(
        name: impl Into<String>,
        fields: Vec<SchemaField>,
        validators: Vec<GroupValidatorSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Group { fields, validators },
            description: None,
        }
    }

    pub fn list(name: impl Into<String>, item_fields: Vec<SchemaField>, initial_items: usize) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::List {
                item_fields,
                item_validators: Vec::new(),
                initial_items,
            },
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Complete form definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Schema identifier (e.g. "customer")
    pub id: String,

    /// Schema version number
    pub version: u32,

    pub description: String,

    /// Top-level fields of the root group
    pub fields: Vec<SchemaField>,

    /// Validators of the root group
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<GroupValidatorSpec>,
}

impl FormSchema {
    /// Get a top-level field by name
    pub fn get_field(&self, field_name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == field_name)
    }

    /// Check structural consistency
    ///
    /// Rejects duplicate sibling names, names that are empty or contain `.`,
    /// and `fieldsMatch` validators that refer to missing or non-control
    /// siblings.
    pub fn validate(&self) -> Result<(), FormError> {
        validate_fields(&self.id, &self.fields, &self.validators)
    }
}

fn validate_fields(
    scope: &str,
    fields: &[SchemaField],
    validators: &[GroupValidatorSpec],
) -> Result<(), FormError> {
    let mut seen = HashSet::new();
    for field in fields {
        if field.name.is_empty() || field.name.contains('.') {
            return Err(FormError::invalid_schema(format!(
                "{}: invalid field name '{}'",
                scope, field.name
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(FormError::invalid_schema(format!(
                "{}: duplicate field '{}'",
                scope, field.name
            )));
        }

        let nested_scope = format!("{}.{}", scope, field.name);
        match &field.kind {
            FieldKind::Control { .. } => {}
            FieldKind::Group { fields, validators } => {
                validate_fields(&nested_scope, fields, validators)?
            }
            FieldKind::List {
                item_fields,
                item_validators,
                ..
            } => validate_fields(&nested_scope, item_fields, item_validators)?,
        }
    }

    for validator in validators {
        match validator {
            GroupValidatorSpec::FieldsMatch { left, right } => {
                for name in [left, right] {
                    let is_control = fields
                        .iter()
                        .any(|f| &f.name == name && matches!(f.kind, FieldKind::Control { .. }));
                    if !is_control {
                        return Err(FormError::invalid_schema(format!(
                            "{}: fieldsMatch refers to unknown control '{}'",
                            scope, name
                        )));
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_test_schema() -> FormSchema {
        FormSchema {
            id: "test".to_string(),
            version: 1,
            description: "Test schema".to_string(),
            fields: vec![
                SchemaField::control(
                    "name",
                    json!(""),
                    vec![ValidatorSpec::Required, ValidatorSpec::MinLength { value: 2 }],
                ),
                SchemaField::group(
                    "pair",
                    vec![
                        SchemaField::control("a", json!(""), vec![]),
                        SchemaField::control("b", json!(""), vec![]),
                    ],
                    vec![GroupValidatorSpec::FieldsMatch {
                        left: "a".to_string(),
                        right: "b".to_string(),
                    }],
                ),
                SchemaField::list("items", vec![SchemaField::control("label", json!(""), vec![])], 1),
            ],
            validators: vec![],
        }
    }

    #[test]
    fn test_serialization() {
        let schema = create_test_schema();
        let json = serde_json::to_value(&schema).unwrap();

        assert_eq!(json["id"], "test");
        assert_eq!(json["fields"][0]["kind"], "control");
        assert_eq!(json["fields"][0]["validators"][1]["type"], "minLength");
        assert_eq!(json["fields"][0]["validators"][1]["value"], 2);
        assert_eq!(json["fields"][1]["kind"], "group");
        assert_eq!(json["fields"][1]["validators"][0]["type"], "fieldsMatch");
        assert_eq!(json["fields"][2]["kind"], "list");
        assert_eq!(json["fields"][2]["item_fields"][0]["name"], "label");
    }

    #[test]
    fn test_deserialization_applies_defaults() {
        let json = json!({
            "id": "contact",
            "version": 2,
            "description": "Contact schema",
            "fields": [
                { "name": "nickname", "kind": "control" },
                {
                    "name": "phones",
                    "kind": "list",
                    "item_fields": [{ "name": "number", "kind": "control", "default": "" }]
                }
            ]
        });

        let schema: FormSchema = serde_json::from_value(json).unwrap();
        assert_eq!(schema.version, 2);
        assert!(schema.validators.is_empty());
        match &schema.fields[0].kind {
            FieldKind::Control { default, validators } => {
                assert!(default.is_null());
                assert!(validators.is_empty());
            }
            other => panic!("Expected control, got {:?}", other),
        }
        match &schema.fields[1].kind {
            FieldKind::List { initial_items, .. } => assert_eq!(*initial_items, 1),
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_accepts_consistent_schema() {
        assert!(create_test_schema().validate().is_ok());
        assert!(create_test_schema().get_field("pair").is_some());
        assert!(create_test_schema().get_field("nonexistent").is_none());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_dotted_names() {
        let mut schema = create_test_schema();
        schema.fields.push(SchemaField::control("name", json!(""), vec![]));
        assert!(matches!(schema.validate(), Err(FormError::InvalidSchema(_))));

        let mut schema = create_test_schema();
        schema.fields.push(SchemaField::control("a.b", json!(""), vec![]));
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_dangling_fields_match() {
        let mut schema = create_test_schema();
        schema.validators.push(GroupValidatorSpec::FieldsMatch {
            left: "name".to_string(),
            right: "pair".to_string(),
        });
        let err = schema.validate().unwrap_err();
        assert!(err.to_string().contains("pair"));
    }
}
