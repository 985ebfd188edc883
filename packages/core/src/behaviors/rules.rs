//! Reactive Update Rules
//!
//! A reactive rule is registered against one control path. When that control
//! receives a new value, the form component calls the rule synchronously, in
//! registration order, after the control's own validators have run and before
//! ancestor group validators run.
//!
//! Rules act on the form only through a [`RuleContext`], which also lets them
//! schedule a deferred callback (`on_timer`) through the component's timer
//! queue. Rescheduling replaces the pending timer, which gives trailing-edge
//! debounce.
//!
//! Built-in rules:
//!
//! - [`NotificationRule`] - `phone` is required iff notification is `text`
//! - [`DebouncedMessageRule`] - recompute a field's message after a quiet period

use crate::behaviors::{get_message, MessageTable, Validator};
use crate::error::FormError;
use crate::events::{EventBus, FormEvent};
use crate::models::{FieldControl, FormNode, FormPath, NotificationMode};
use crate::operations::{TimerHandle, TimerQueue};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Position of a rule in the component's registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub(crate) usize);

impl RuleId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule#{}", self.0)
    }
}

/// Mutable view of the form handed to a rule while it runs
pub struct RuleContext<'a> {
    rule_id: RuleId,
    root: &'a mut FormNode,
    timers: &'a mut TimerQueue<RuleId>,
    messages: &'a mut BTreeMap<String, String>,
    events: &'a EventBus,
    revalidated: &'a mut Vec<FormPath>,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(
        rule_id: RuleId,
        root: &'a mut FormNode,
        timers: &'a mut TimerQueue<RuleId>,
        messages: &'a mut BTreeMap<String, String>,
        events: &'a EventBus,
        revalidated: &'a mut Vec<FormPath>,
    ) -> Self {
        Self {
            rule_id,
            root,
            timers,
            messages,
            events,
            revalidated,
        }
    }

    pub fn rule_id(&self) -> RuleId {
        self.rule_id
    }

    pub fn field(&self, path: &FormPath) -> Result<&FieldControl, FormError> {
        self.root.field(path)
    }

    /// Replace a control's validators and revalidate it
    ///
    /// The control's ancestors are revalidated by the component once the rule
    /// returns.
    pub fn replace_validators(
        &mut self,
        path: &FormPath,
        validators: Vec<Validator>,
    ) -> Result<(), FormError> {
        let control = self.root.field_mut(path)?;
        control.set_validators(validators);
        if control.revalidate() {
            self.events.emit(FormEvent::StatusChanged {
                path: path.to_string(),
                faults: control.faults().clone(),
            });
        }
        self.revalidated.push(path.clone());
        Ok(())
    }

    /// Schedule this rule's `on_timer`, replacing any pending schedule
    pub fn schedule(&mut self, delay: Duration) -> TimerHandle<RuleId> {
        self.timers.schedule(self.rule_id, delay)
    }

    pub fn cancel_scheduled(&mut self) -> bool {
        self.timers.cancel_key(self.rule_id)
    }

    /// Store a derived message for `path` and notify subscribers
    pub fn publish_message(&mut self, path: &FormPath, message: String) {
        self.messages.insert(path.to_string(), message.clone());
        self.events.emit(FormEvent::MessageUpdated {
            path: path.to_string(),
            message,
        });
    }
}

pub trait ReactiveRule: Send {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Called synchronously after the observed control changed value
    fn on_value_change(&mut self, ctx: &mut RuleContext<'_>, value: &Value)
        -> Result<(), FormError>;

    /// Called when a timer scheduled through [`RuleContext::schedule`] expires
    fn on_timer(&mut self, _ctx: &mut RuleContext<'_>) -> Result<(), FormError> {
        Ok(())
    }
}

/// Makes the phone control required while notification is `text`
///
/// Any value other than `text` behaves like `email`: phone validators are
/// cleared. Applying the same mode twice is a no-op on phone's state.
#[derive(Debug, Clone)]
pub struct NotificationRule {
    phone: FormPath,
}

impl NotificationRule {
    pub fn new(phone: FormPath) -> Self {
        Self { phone }
    }
}

impl ReactiveRule for NotificationRule {
    fn name(&self) -> &'static str {
        "notification"
    }

    fn on_value_change(
        &mut self,
        ctx: &mut RuleContext<'_>,
        value: &Value,
    ) -> Result<(), FormError> {
        let mode = match value.as_str().map(str::parse::<NotificationMode>) {
            Some(Ok(mode)) => mode,
            _ => {
                tracing::warn!(
                    "Unrecognized notification value {}, treating as '{}'",
                    value,
                    NotificationMode::Email
                );
                NotificationMode::Email
            }
        };

        let validators = match mode {
            NotificationMode::Text => vec![Validator::Required],
            NotificationMode::Email => Vec::new(),
        };

        tracing::debug!(
            "Notification set to '{}': {} requires {} validator(s)",
            mode,
            self.phone,
            validators.len()
        );
        ctx.replace_validators(&self.phone, validators)
    }
}

/// Recomputes a control's user-facing message once its value has been quiet
/// for `delay`
///
/// The message is empty unless the control is touched or dirty and has
/// faults; otherwise it is the table's messages for those faults joined by a
/// space.
#[derive(Debug, Clone)]
pub struct DebouncedMessageRule {
    path: FormPath,
    delay: Duration,
    table: MessageTable,
}

impl DebouncedMessageRule {
    pub fn new(path: FormPath, delay: Duration, table: MessageTable) -> Self {
        Self { path, delay, table }
    }

    pub fn path(&self) -> &FormPath {
        &self.path
    }
}

impl ReactiveRule for DebouncedMessageRule {
    fn name(&self) -> &'static str {
        "debounced-message"
    }

    fn on_value_change(
        &mut self,
        ctx: &mut RuleContext<'_>,
        _value: &Value,
    ) -> Result<(), FormError> {
        ctx.schedule(self.delay);
        tracing::trace!("Message for {} due in {:?}", self.path, self.delay);
        Ok(())
    }

    fn on_timer(&mut self, ctx: &mut RuleContext<'_>) -> Result<(), FormError> {
        let message = get_message(ctx.field(&self.path)?, &self.table);
        tracing::debug!("Recomputed message for {}: {:?}", self.path, message);
        ctx.publish_message(&self.path, message);
        Ok(())
    }
}
