//! Data Models
//!
//! This module contains the data structures of the signup form:
//!
//! - `FormSchema` - Declarative form description (fields, groups, lists, validators)
//! - `FormNode` - Live form tree compiled from a schema
//! - `FaultKind` / `FaultSet` - Validation verdicts attached to nodes
//! - `Customer` - Typed submission record read from a form snapshot
//!
//! Field values are plain `serde_json::Value`s so snapshots and patches are JSON.

pub mod core_schemas;
mod customer;
mod fault;
mod form_node;
mod path;
pub mod schema;

pub use customer::{Address, AddressType, Customer, CustomerPatch, NotificationMode};
pub use fault::{FaultKind, FaultSet};
pub use form_node::{FieldControl, FormGroup, FormList, FormNode, InvalidNode};
pub use path::FormPath;
pub use schema::{FieldKind, FormSchema, GroupValidatorSpec, SchemaField, ValidatorSpec};

#[cfg(test)]
mod form_node_test;
