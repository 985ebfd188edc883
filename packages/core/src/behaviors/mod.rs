//! Validation Behavior System
//!
//! This module provides the behaviors that run against the form tree:
//!
//! - `Validator` - Pure per-field checks (required, length, pattern, range)
//! - `GroupValidator` - Cross-field checks attached to a group (fields match)
//! - `MessageTable` - Immutable fault → user-facing message mapping
//! - `ReactiveRule` trait - Side-effecting rules triggered by value changes
//!   (notification → phone requirement, debounced email message)
//!
//! Validators are data-driven (compiled from schema specs); rules are trait
//! objects registered against a path on the form component.

mod group_validators;
mod messages;
pub mod rules;
mod validators;

pub use group_validators::{validate_group, GroupValidator};
pub use messages::{get_message, MessageTable};
pub use rules::{DebouncedMessageRule, NotificationRule, ReactiveRule, RuleContext, RuleId};
pub use validators::{is_empty_input, numeric_value, validate_all, Validator};
