//! Signup Form Core
//!
//! This crate provides the form tree, validation and reactive rules behind the
//! customer signup form.
//!
//! # Architecture
//!
//! - **Schema-driven tree**: The form is compiled from a declarative `FormSchema`
//!   into a tree of controls, groups and lists holding JSON values
//! - **Pure validators**: Per-field and cross-field checks recompute fault sets
//!   synchronously on every value change
//! - **Reactive rules**: Trait objects registered against a control path adjust
//!   other controls (phone requirement) or schedule debounced work (email message)
//! - **Single owner**: Timers only record deadlines; the owning session fires
//!   them on its own task, so no form state is shared across threads
//!
//! # Modules
//!
//! - [`models`] - Data structures (schema, form tree, faults, customer record)
//! - [`behaviors`] - Validators, group validators, messages and reactive rules
//! - [`operations`] - Timer queue and snapshot serialization
//! - [`services`] - Form component and session event loop
//! - [`config`] - Form configuration
//! - [`events`] - Outbound change notifications

pub mod behaviors;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use behaviors::*;
pub use config::{FormConfig, SavePolicy, DEFAULT_EMAIL_PATTERN};
pub use error::FormError;
pub use events::{EventBus, FormEvent};
pub use models::*;
pub use operations::SaveFormat;
pub use services::*;
