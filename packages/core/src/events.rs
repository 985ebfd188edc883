//! Form Events
//!
//! Outbound notifications emitted by the form component whenever its state
//! changes. A renderer subscribes and rebinds the affected paths without
//! polling the tree.
//!
//! # Architecture
//!
//! Events go through a tokio broadcast channel, so any number of subscribers
//! may listen. Emission never blocks and never fails: with no subscriber the
//! event is dropped, and slow subscribers observe `RecvError::Lagged`.

use crate::models::FaultSet;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FormEvent {
    /// A control received a new value (user input or patch)
    #[serde(rename_all = "camelCase")]
    ValueChanged { path: String, value: Value },

    /// Faults attached to a node changed
    #[serde(rename_all = "camelCase")]
    StatusChanged { path: String, faults: FaultSet },

    /// A derived message was recomputed
    #[serde(rename_all = "camelCase")]
    MessageUpdated { path: String, message: String },

    /// A new item was appended to a list
    #[serde(rename_all = "camelCase")]
    ItemAdded { path: String, index: usize },

    /// The form was serialized by `save`
    #[serde(rename_all = "camelCase")]
    Saved { payload: String, valid: bool },
}

impl FormEvent {
    /// String form of the event type, for logging and renderer dispatch
    pub fn event_type(&self) -> &str {
        match self {
            FormEvent::ValueChanged { .. } => "value:changed",
            FormEvent::StatusChanged { .. } => "status:changed",
            FormEvent::MessageUpdated { .. } => "message:updated",
            FormEvent::ItemAdded { .. } => "item:added",
            FormEvent::Saved { .. } => "form:saved",
        }
    }
}

/// Sending half of the event broadcast, owned by the form component
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<FormEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: FormEvent) {
        tracing::trace!("Emitting {}", event.event_type());
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }
}
