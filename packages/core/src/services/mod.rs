//! Form Services
//!
//! This module contains the stateful parts of the signup form:
//!
//! - `CustomerForm` - Mounted form component: tree, rules, timers, messages, events
//! - `FormSession` - Single-task event loop feeding user events and timers to a form
//!
//! Everything that mutates the form runs on the owner's task; services never
//! spawn callbacks of their own.

pub mod customer_form;
pub mod session;

pub use customer_form::{CustomerForm, SaveReport};
pub use session::{FormSession, SessionHandle, UserEvent};
