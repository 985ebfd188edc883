//! Core Schema Definitions
//!
//! Canonical definition of the customer signup form.
//!
//! ## Fields
//!
//! - **firstName** - required, at least 3 characters
//! - **lastName** - required, at most 50 characters
//! - **emailGroup** - `email` (required, simplified email pattern) and
//!   `confirmEmail` (required), with a group-level match check
//! - **sendCatalog** - catalog opt-in, defaults to `true`
//! - **phone** - no validators until notification switches to `text`
//! - **notification** - `email` (default) or `text`
//! - **rating** - optional, within the configured rating bounds
//! - **addresses** - list of address groups, one created at mount

use crate::config::FormConfig;
use crate::models::schema::{FormSchema, GroupValidatorSpec, SchemaField, ValidatorSpec};
use serde_json::json;

pub const CUSTOMER_SCHEMA_ID: &str = "customer";

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
pub const EMAIL_GROUP: &str = "emailGroup";
pub const EMAIL: &str = "emailGroup.email";
pub const CONFIRM_EMAIL: &str = "emailGroup.confirmEmail";
pub const SEND_CATALOG: &str = "sendCatalog";
pub const PHONE: &str = "phone";
pub const NOTIFICATION: &str = "notification";
pub const RATING: &str = "rating";
pub const ADDRESSES: &str = "addresses";

const FIRST_NAME_MIN_LENGTH: usize = 3;
const LAST_NAME_MAX_LENGTH: usize = 50;

/// Build the customer signup schema for the given configuration
///
/// Rating bounds and the email pattern come from `config`; everything else is
/// fixed by the form design.
pub fn customer_schema(config: &FormConfig) -> FormSchema {
    FormSchema {
        id: CUSTOMER_SCHEMA_ID.to_string(),
        version: 1,
        description: "Customer signup form".to_string(),
        fields: vec![
            SchemaField::control(
                FIRST_NAME,
                json!(""),
                vec![
                    ValidatorSpec::Required,
                    ValidatorSpec::MinLength {
                        value: FIRST_NAME_MIN_LENGTH,
                    },
                ],
            ),
            SchemaField::control(
                LAST_NAME,
                json!(""),
                vec![
                    ValidatorSpec::Required,
                    ValidatorSpec::MaxLength {
                        value: LAST_NAME_MAX_LENGTH,
                    },
                ],
            ),
            SchemaField::group(
                EMAIL_GROUP,
                vec![
                    SchemaField::control(
                        "email",
                        json!(""),
                        vec![
                            ValidatorSpec::Required,
                            ValidatorSpec::Pattern {
                                pattern: config.email_pattern.clone(),
                            },
                        ],
                    ),
                    SchemaField::control("confirmEmail", json!(""), vec![ValidatorSpec::Required]),
                ],
                vec![GroupValidatorSpec::FieldsMatch {
                    left: "email".to_string(),
                    right: "confirmEmail".to_string(),
                }],
            )
            .with_description("Email address entered twice"),
            SchemaField::control(SEND_CATALOG, json!(true), vec![]),
            SchemaField::control(PHONE, json!(""), vec![])
                .with_description("Required only when notifying by text"),
            SchemaField::control(NOTIFICATION, json!("email"), vec![]),
            SchemaField::control(
                RATING,
                json!(null),
                vec![ValidatorSpec::Range {
                    min: config.min_rating,
                    max: config.max_rating,
                }],
            ),
            SchemaField::list(ADDRESSES, address_fields(), 1),
        ],
        validators: vec![],
    }
}

/// Item template of the `addresses` list; no constraints
pub fn address_fields() -> Vec<SchemaField> {
    vec![
        SchemaField::control("addressType", json!("home"), vec![]),
        SchemaField::control("street1", json!(""), vec![]),
        SchemaField::control("street2", json!(""), vec![]),
        SchemaField::control("city", json!(""), vec![]),
        SchemaField::control("state", json!(""), vec![]),
        SchemaField::control("zip", json!(""), vec![]),
    ]
}
