//! Customer Submission Record
//!
//! Typed view over a form snapshot. The form tree nests `email` and
//! `confirmEmail` under `emailGroup`; the record flattens them.
//!
//! # Examples
//!
//! ```rust
//! use signup_core::models::{CustomerPatch, NotificationMode};
//!
//! let patch = CustomerPatch::test_data();
//! let json = patch.to_form_patch();
//! assert_eq!(json["emailGroup"]["email"], "jonny@mail.ru");
//! assert!(json.get("addresses").is_none());
//! assert_eq!(NotificationMode::default(), NotificationMode::Email);
//! ```

use crate::behaviors::numeric_value;
use crate::error::FormError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// How the customer wants to be notified; exactly one is active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMode {
    #[default]
    Email,
    Text,
}

impl NotificationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for NotificationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "text" => Ok(Self::Text),
            _ => Err(format!("Invalid notification mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    #[default]
    Home,
    Work,
}

/// Mailing address; every field is optional text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_type: AddressType,
    pub street1: String,
    pub street2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub confirm_email: String,
    pub send_catalog: bool,
    pub phone: String,
    pub notification: NotificationMode,
    /// `None` when the rating is absent or not numeric
    pub rating: Option<f64>,
    pub addresses: Vec<Address>,
}

/// Shape of the form snapshot before flattening
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerFormValue {
    first_name: String,
    last_name: String,
    email_group: EmailGroupValue,
    send_catalog: bool,
    phone: String,
    notification: NotificationMode,
    #[serde(default)]
    rating: Value,
    addresses: Vec<Address>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EmailGroupValue {
    email: String,
    confirm_email: String,
}

impl Customer {
    /// Build the typed record from a customer form snapshot
    pub fn from_form_value(value: &Value) -> Result<Self, FormError> {
        let form: CustomerFormValue = serde_json::from_value(value.clone())?;
        Ok(Self {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email_group.email,
            confirm_email: form.email_group.confirm_email,
            send_catalog: form.send_catalog,
            phone: form.phone,
            notification: form.notification,
            rating: numeric_value(&form.rating),
            addresses: form.addresses,
        })
    }
}

/// Partial customer record; only `Some` fields are applied to the form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_catalog: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl CustomerPatch {
    /// Canned demo record
    pub fn test_data() -> Self {
        Self {
            first_name: Some("John".to_string()),
            last_name: Some("Smith".to_string()),
            email: Some("jonny@mail.ru".to_string()),
            send_catalog: Some(true),
            ..Self::default()
        }
    }

    /// JSON patch shaped like the form tree (email fields nested under
    /// `emailGroup`); absent fields produce no keys at all
    pub fn to_form_patch(&self) -> Value {
        let mut root = Map::new();
        let mut email_group = Map::new();

        if let Some(first_name) = &self.first_name {
            root.insert("firstName".to_string(), Value::from(first_name.as_str()));
        }
        if let Some(last_name) = &self.last_name {
            root.insert("lastName".to_string(), Value::from(last_name.as_str()));
        }
        if let Some(email) = &self.email {
            email_group.insert("email".to_string(), Value::from(email.as_str()));
        }
        if let Some(confirm_email) = &self.confirm_email {
            email_group.insert("confirmEmail".to_string(), Value::from(confirm_email.as_str()));
        }
        if !email_group.is_empty() {
            root.insert("emailGroup".to_string(), Value::Object(email_group));
        }
        if let Some(send_catalog) = self.send_catalog {
            root.insert("sendCatalog".to_string(), Value::Bool(send_catalog));
        }
        if let Some(phone) = &self.phone {
            root.insert("phone".to_string(), Value::from(phone.as_str()));
        }
        if let Some(notification) = self.notification {
            root.insert("notification".to_string(), Value::from(notification.as_str()));
        }
        if let Some(rating) = self.rating {
            root.insert("rating".to_string(), Value::from(rating));
        }

        Value::Object(root)
    }
}
