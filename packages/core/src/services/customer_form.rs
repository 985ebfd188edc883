//! Customer Signup Form Component
//!
//! Owns the live form tree and everything that reacts to it:
//!
//! - the tree compiled from the customer schema
//! - reactive rules registered against control paths
//! - the timer queue backing debounced rules
//! - derived messages and the outbound event bus
//!
//! # Dispatch order
//!
//! A value change on a control runs, synchronously and in this order:
//!
//! 1. the control's own validators
//! 2. every rule registered on that path, in registration order
//! 3. group validators of every ancestor, deepest first
//!
//! A rule error does not cut this short: the remaining rules and step 3 still
//! run, and the first rule error is returned afterwards.
//!
//! Timers only record deadlines. The owner of the component (usually a
//! [`FormSession`](crate::services::FormSession)) waits for them and calls
//! [`CustomerForm::fire_timer`], so rule callbacks run on the same task as
//! input handling.
//!
//! # Examples
//!
//! ```rust
//! use signup_core::{CustomerForm, FormConfig, FaultKind};
//! use serde_json::json;
//!
//! let mut form = CustomerForm::mount(FormConfig::default()).unwrap();
//! form.set_value("rating", json!(11)).unwrap();
//! assert!(form.faults("rating").unwrap().contains(FaultKind::Range));
//!
//! form.set_value("notification", json!("text")).unwrap();
//! assert!(form.faults("phone").unwrap().contains(FaultKind::Required));
//! ```

use crate::behaviors::{
    DebouncedMessageRule, MessageTable, NotificationRule, ReactiveRule, RuleContext, RuleId,
};
use crate::config::{FormConfig, SavePolicy};
use crate::error::FormError;
use crate::events::{EventBus, FormEvent};
use crate::models::core_schemas::{self, customer_schema};
use crate::models::{
    Customer, CustomerPatch, FaultSet, FieldControl, FormGroup, FormNode, FormPath, FormSchema,
    InvalidNode, NotificationMode,
};
use crate::operations::{serialize_snapshot, TimerQueue};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::broadcast;
use tokio::time::Instant;

struct RuleBinding {
    path: FormPath,
    rule: Box<dyn ReactiveRule>,
}

/// Outcome of [`CustomerForm::save`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveReport {
    /// Serialized snapshot as written to the log sink
    pub payload: String,

    /// Whether the form had no faults at save time
    pub valid: bool,

    /// Nodes that carried faults at save time
    pub faults: Vec<InvalidNode>,
}

pub struct CustomerForm {
    config: FormConfig,
    schema: FormSchema,
    root: FormNode,
    rules: Vec<RuleBinding>,
    timers: TimerQueue<RuleId>,
    messages: BTreeMap<String, String>,
    events: EventBus,
}

impl CustomerForm {
    /// Build the customer form with its default values and built-in rules
    ///
    /// Registers the notification rule on `notification` and the debounced
    /// email message rule on `emailGroup.email`.
    pub fn mount(config: FormConfig) -> Result<Self, FormError> {
        let schema = customer_schema(&config);
        let delay = config.email_debounce();
        let mut form = Self::from_schema(schema, config)?;

        form.register_rule(
            core_schemas::NOTIFICATION,
            Box::new(NotificationRule::new(core_schemas::PHONE.parse()?)),
        )?;
        form.register_rule(
            core_schemas::EMAIL,
            Box::new(DebouncedMessageRule::new(
                core_schemas::EMAIL.parse()?,
                delay,
                MessageTable::email_defaults(),
            )),
        )?;

        tracing::debug!(
            "Mounted '{}' form with {} rule(s)",
            form.schema.id,
            form.rules.len()
        );
        Ok(form)
    }

    /// Build a form from any schema, without rules
    pub fn from_schema(schema: FormSchema, config: FormConfig) -> Result<Self, FormError> {
        config.validate().map_err(FormError::invalid_config)?;

        let root = FormNode::Group(FormGroup::from_schema(&schema)?);
        let events = EventBus::new(config.event_capacity);
        Ok(Self {
            config,
            schema,
            root,
            rules: Vec::new(),
            timers: TimerQueue::new(),
            messages: BTreeMap::new(),
            events,
        })
    }

    /// Register a rule on a control path; rules run in registration order
    pub fn register_rule(
        &mut self,
        path: &str,
        rule: Box<dyn ReactiveRule>,
    ) -> Result<RuleId, FormError> {
        let path: FormPath = path.parse()?;
        self.root.field(&path)?;

        let id = RuleId(self.rules.len());
        tracing::debug!("Registered rule '{}' as {} on {}", rule.name(), id, path);
        self.rules.push(RuleBinding { path, rule });
        Ok(id)
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub fn root(&self) -> &FormNode {
        &self.root
    }

    pub fn node(&self, path: &str) -> Result<&FormNode, FormError> {
        let path: FormPath = path.parse()?;
        self.root
            .find(&path)
            .ok_or_else(|| FormError::path_not_found(path.to_string()))
    }

    pub fn field(&self, path: &str) -> Result<&FieldControl, FormError> {
        self.root.field(&path.parse()?)
    }

    /// Faults attached to the node itself (a group's own faults only)
    pub fn faults(&self, path: &str) -> Result<&FaultSet, FormError> {
        Ok(self.node(path)?.faults())
    }

    pub fn is_valid(&self) -> bool {
        self.root.is_valid()
    }

    /// Every node currently carrying faults, in tree order
    pub fn invalid_nodes(&self) -> Vec<InvalidNode> {
        let mut out = Vec::new();
        self.root.collect_invalid(&FormPath::root(), &mut out);
        out
    }

    /// Dotted paths of every node carrying faults (`""` is the root)
    pub fn invalid_paths(&self) -> Vec<String> {
        self.invalid_nodes().into_iter().map(|node| node.path).collect()
    }

    /// Latest derived message for a path; empty until first computed
    pub fn message(&self, path: &str) -> &str {
        self.messages.get(path).map(String::as_str).unwrap_or("")
    }

    pub fn email_message(&self) -> &str {
        self.message(core_schemas::EMAIL)
    }

    /// Untyped snapshot of the whole tree
    pub fn value(&self) -> Value {
        self.root.value()
    }

    pub fn customer(&self) -> Result<Customer, FormError> {
        Customer::from_form_value(&self.value())
    }

    /// User input: set a control's value and mark it dirty
    pub fn set_value(&mut self, path: &str, value: Value) -> Result<(), FormError> {
        let path: FormPath = path.parse()?;
        self.apply_change(&path, value, true)
    }

    /// User blur: mark a control touched. No validation runs.
    pub fn touch(&mut self, path: &str) -> Result<(), FormError> {
        let path: FormPath = path.parse()?;
        self.root.field_mut(&path)?.mark_touched();
        Ok(())
    }

    pub fn set_notification(&mut self, mode: NotificationMode) -> Result<(), FormError> {
        self.set_value(core_schemas::NOTIFICATION, Value::from(mode.as_str()))
    }

    /// Programmatic partial update
    ///
    /// Only leaves named in `patch` change; absent keys and unknown keys leave
    /// the tree alone, and list items are matched by position without being
    /// created. Patched controls are not marked dirty, but validators and
    /// rules run as for any value change. Returns the patched paths.
    pub fn patch_value(&mut self, patch: &Value) -> Result<Vec<String>, FormError> {
        let mut leaves = Vec::new();
        self.root.patch_leaves(patch, &FormPath::root(), &mut leaves);

        let mut patched = Vec::with_capacity(leaves.len());
        for (path, value) in leaves {
            self.apply_change(&path, value, false)?;
            patched.push(path.to_string());
        }
        tracing::debug!("Patched {} control(s)", patched.len());
        Ok(patched)
    }

    /// Fill the form with the canned demo customer
    pub fn populate_test_data(&mut self) -> Result<Vec<String>, FormError> {
        self.patch_value(&CustomerPatch::test_data().to_form_patch())
    }

    /// Append a default address; returns its index
    pub fn add_address(&mut self) -> Result<usize, FormError> {
        self.add_list_item(core_schemas::ADDRESSES)
    }

    pub fn add_list_item(&mut self, path: &str) -> Result<usize, FormError> {
        let path: FormPath = path.parse()?;
        let index = self.root.list_mut(&path)?.push_default();
        self.events.emit(FormEvent::ItemAdded {
            path: path.to_string(),
            index,
        });
        tracing::debug!("Appended item {} to {}", index, path);
        Ok(index)
    }

    pub fn address_count(&self) -> usize {
        self.node(core_schemas::ADDRESSES)
            .ok()
            .and_then(FormNode::as_list)
            .map_or(0, |list| list.len())
    }

    /// Serialize the current snapshot and write it to the log sink
    ///
    /// Validation is advisory under [`SavePolicy::Advisory`]: an invalid form
    /// is still saved and the outstanding faults are logged. Under
    /// [`SavePolicy::BlockOnInvalid`] an invalid form is refused.
    pub fn save(&self) -> Result<SaveReport, FormError> {
        let faults = self.invalid_nodes();
        let valid = faults.is_empty();

        if !valid {
            let paths: Vec<String> = faults
                .iter()
                .map(|node| format!("{}{}", display_path(&node.path), node.faults))
                .collect();
            match self.config.save_policy {
                SavePolicy::BlockOnInvalid => return Err(FormError::save_blocked(paths)),
                SavePolicy::Advisory => {
                    tracing::warn!("Saving form with outstanding faults: {}", paths.join(", "))
                }
            }
        }

        let payload = serialize_snapshot(&self.value(), self.config.save_format)?;
        tracing::info!(target: "signup_core::save", "Saved: {}", payload);
        self.events.emit(FormEvent::Saved {
            payload: payload.clone(),
            valid,
        });

        Ok(SaveReport {
            payload,
            valid,
            faults,
        })
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Wait until at least one rule timer expires; see [`TimerQueue::next_expired`]
    pub async fn next_timers(&mut self) -> Vec<RuleId> {
        self.timers.next_expired().await
    }

    /// Fire every rule timer that has expired by now; returns the fired rules
    pub fn run_due_timers(&mut self) -> Result<Vec<RuleId>, FormError> {
        let due = self.timers.poll_expired(Instant::now());
        for id in &due {
            self.fire_timer(*id)?;
        }
        Ok(due)
    }

    /// Run a rule's timer callback
    pub fn fire_timer(&mut self, id: RuleId) -> Result<(), FormError> {
        let mut revalidated = Vec::new();
        let outcome = {
            let Self {
                root,
                rules,
                timers,
                messages,
                events,
                ..
            } = self;
            let binding = rules
                .get_mut(id.index())
                .ok_or(FormError::UnknownRule(id.index()))?;
            tracing::debug!("Timer fired for rule '{}' ({})", binding.rule.name(), id);
            let mut ctx = RuleContext::new(id, root, timers, messages, events, &mut revalidated);
            binding.rule.on_timer(&mut ctx)
        };

        // Whatever the rule managed to change still gets its ancestors rechecked
        for path in revalidated {
            self.revalidate_ancestors(&path);
        }
        outcome
    }

    /// Unmount: cancel pending timers so no callback outlives the tree
    ///
    /// Returns the number of timers cancelled.
    pub fn unmount(mut self) -> usize {
        let cancelled = self.cancel_timers();
        tracing::debug!("Unmounted '{}' form", self.schema.id);
        cancelled
    }

    pub fn cancel_timers(&mut self) -> usize {
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            tracing::debug!("Cancelled {} pending timer(s)", cancelled);
        }
        cancelled
    }

    fn apply_change(
        &mut self,
        path: &FormPath,
        value: Value,
        from_input: bool,
    ) -> Result<(), FormError> {
        // 1. the control's own validators
        let control = self.root.field_mut(path)?;
        control.set_value(value.clone(), from_input);
        let faults = control.faults().clone();

        self.events.emit(FormEvent::ValueChanged {
            path: path.to_string(),
            value: value.clone(),
        });
        self.events.emit(FormEvent::StatusChanged {
            path: path.to_string(),
            faults,
        });

        // 2. rules bound to this path; a failing rule does not stop the rest
        let mut revalidated = Vec::new();
        let mut first_error = None;
        {
            let Self {
                root,
                rules,
                timers,
                messages,
                events,
                ..
            } = self;
            for (index, binding) in rules.iter_mut().enumerate() {
                if binding.path != *path {
                    continue;
                }
                tracing::trace!("Dispatching {} to rule '{}'", path, binding.rule.name());
                let mut ctx = RuleContext::new(
                    RuleId(index),
                    &mut *root,
                    &mut *timers,
                    &mut *messages,
                    &*events,
                    &mut revalidated,
                );
                if let Err(e) = binding.rule.on_value_change(&mut ctx, &value) {
                    tracing::warn!("Rule '{}' failed on {}: {}", binding.rule.name(), path, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        // 3. ancestor group validators, root-ward
        self.revalidate_ancestors(path);
        for extra in revalidated {
            self.revalidate_ancestors(&extra);
        }
        first_error.map_or(Ok(()), Err)
    }

    fn revalidate_ancestors(&mut self, path: &FormPath) {
        for changed in self.root.revalidate_ancestors(path) {
            if let Some(node) = self.root.find(&changed) {
                self.events.emit(FormEvent::StatusChanged {
                    path: changed.to_string(),
                    faults: node.faults().clone(),
                });
            }
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
