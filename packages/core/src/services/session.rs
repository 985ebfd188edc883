//! Form Session
//!
//! Drives a [`CustomerForm`] from a stream of user events on a single task.
//!
//! ## Event Loop
//!
//! The session waits on two sources at once:
//! 1. user events arriving on an mpsc channel (input, blur, actions)
//! 2. the form's earliest pending rule timer
//!
//! Whichever is ready first is handled to completion before the next wait,
//! so rule callbacks and input handling never interleave. Closing every
//! [`SessionHandle`] ends the loop: pending timers are cancelled and the form
//! is handed back to the caller.
//!
//! Errors from individual events are logged and the loop carries on; a bad
//! path from the renderer should not tear the form down.

use crate::behaviors::RuleId;
use crate::error::FormError;
use crate::models::NotificationMode;
use crate::services::{CustomerForm, SaveReport};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Events a renderer forwards to the session
#[derive(Debug, Clone, PartialEq)]
pub enum UserEvent {
    /// The user typed or picked a value
    Input { path: String, value: Value },
    /// The user left a control
    Blur { path: String },
    SetNotification(NotificationMode),
    AddAddress,
    PopulateTestData,
    Save,
}

/// Cloneable sender side of a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    inbox: mpsc::Sender<UserEvent>,
}

impl SessionHandle {
    /// Queue an event; fails only once the session has stopped
    pub async fn send(&self, event: UserEvent) -> Result<(), UserEvent> {
        self.inbox.send(event).await.map_err(|e| e.0)
    }

    pub async fn input(&self, path: &str, value: Value) -> Result<(), UserEvent> {
        self.send(UserEvent::Input {
            path: path.to_string(),
            value,
        })
        .await
    }

    pub async fn blur(&self, path: &str) -> Result<(), UserEvent> {
        self.send(UserEvent::Blur {
            path: path.to_string(),
        })
        .await
    }
}

enum Step {
    User(UserEvent),
    Timers(Vec<RuleId>),
    Closed,
}

pub struct FormSession {
    form: CustomerForm,
    inbox: mpsc::Receiver<UserEvent>,
}

impl FormSession {
    /// Wrap a mounted form; `capacity` bounds queued user events
    pub fn new(form: CustomerForm, capacity: usize) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { form, inbox: rx }, SessionHandle { inbox: tx })
    }

    /// Start the loop on a background task
    pub fn spawn(form: CustomerForm, capacity: usize) -> (SessionHandle, JoinHandle<CustomerForm>) {
        let (session, handle) = Self::new(form, capacity);
        (handle, tokio::spawn(session.run()))
    }

    pub fn form(&self) -> &CustomerForm {
        &self.form
    }

    /// Run until every handle is dropped, then return the form
    pub async fn run(mut self) -> CustomerForm {
        tracing::debug!("Form session started");

        loop {
            let step = tokio::select! {
                biased; // User events first, so input that lands with an expiry reschedules it

                event = self.inbox.recv() => match event {
                    Some(event) => Step::User(event),
                    None => Step::Closed,
                },

                due = self.form.next_timers() => Step::Timers(due),
            };

            match step {
                Step::User(event) => {
                    if let Err(e) = self.handle(event) {
                        tracing::warn!("Form session event failed: {}", e);
                    }
                }
                Step::Timers(due) => {
                    for id in due {
                        if let Err(e) = self.form.fire_timer(id) {
                            tracing::warn!("Timer callback for {} failed: {}", id, e);
                        }
                    }
                }
                Step::Closed => break,
            }
        }

        let cancelled = self.form.cancel_timers();
        tracing::debug!(
            "Form session closed, {} pending timer(s) cancelled",
            cancelled
        );
        self.form
    }

    fn handle(&mut self, event: UserEvent) -> Result<(), FormError> {
        tracing::trace!("Handling {:?}", event);
        match event {
            UserEvent::Input { path, value } => self.form.set_value(&path, value),
            UserEvent::Blur { path } => self.form.touch(&path),
            UserEvent::SetNotification(mode) => self.form.set_notification(mode),
            UserEvent::AddAddress => self.form.add_address().map(|_| ()),
            UserEvent::PopulateTestData => self.form.populate_test_data().map(|_| ()),
            UserEvent::Save => self.form.save().map(|report: SaveReport| {
                tracing::debug!("Session save finished (valid: {})", report.valid);
            }),
        }
    }
}
