//! Live Form Tree
//!
//! The form is a tree of [`FormNode`]s compiled from a [`FormSchema`]:
//!
//! - `Field` - a leaf control with value, dirty/touched flags, validators and faults
//! - `Group` - named children plus group-level (cross-field) validators
//! - `List` - ordered groups built from an item template, supports append
//!
//! Every node exclusively owns its children. Values are `serde_json::Value`
//! so that snapshots and patches are plain JSON.

use crate::behaviors::{validate_all, validate_group, GroupValidator, Validator};
use crate::error::FormError;
use crate::models::{FaultSet, FieldKind, FormPath, FormSchema, GroupValidatorSpec, SchemaField};
use serde::Serialize;
use serde_json::{Map, Value};

static NO_FAULTS: FaultSet = FaultSet::new();

/// Leaf control
#[derive(Debug, Clone)]
pub struct FieldControl {
    value: Value,
    dirty: bool,
    touched: bool,
    validators: Vec<Validator>,
    faults: FaultSet,
}

impl FieldControl {
    /// Create a pristine, untouched control and run its validators once
    pub fn new(value: Value, validators: Vec<Validator>) -> Self {
        let mut control = Self {
            value,
            dirty: false,
            touched: false,
            validators,
            faults: FaultSet::new(),
        };
        control.revalidate();
        control
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Never received a user value change
    pub fn is_pristine(&self) -> bool {
        !self.dirty
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn faults(&self) -> &FaultSet {
        &self.faults
    }

    pub fn is_valid(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Replace the value and rerun validators
    ///
    /// `mark_dirty` is set for user input; programmatic patches leave the
    /// dirty flag alone.
    pub fn set_value(&mut self, value: Value, mark_dirty: bool) {
        self.value = value;
        if mark_dirty {
            self.dirty = true;
        }
        self.revalidate();
    }

    pub fn mark_touched(&mut self) {
        self.touched = true;
    }

    /// Replace the active validators. Faults are not recomputed until
    /// [`revalidate`](Self::revalidate).
    pub fn set_validators(&mut self, validators: Vec<Validator>) {
        self.validators = validators;
    }

    pub fn clear_validators(&mut self) {
        self.validators.clear();
    }

    /// Recompute faults; returns true if the fault set changed
    pub fn revalidate(&mut self) -> bool {
        let faults = validate_all(&self.validators, &self.value);
        let changed = faults != self.faults;
        self.faults = faults;
        changed
    }
}

/// Named children with group-level validators
#[derive(Debug, Clone)]
pub struct FormGroup {
    children: Vec<(String, FormNode)>,
    validators: Vec<GroupValidator>,
    faults: FaultSet,
}

impl FormGroup {
    pub fn new(children: Vec<(String, FormNode)>, validators: Vec<GroupValidator>) -> Self {
        let mut group = Self {
            children,
            validators,
            faults: FaultSet::new(),
        };
        group.revalidate_own();
        group
    }

    /// Compile a whole schema into its root group
    pub fn from_schema(schema: &FormSchema) -> Result<Self, FormError> {
        schema.validate()?;
        Self::from_fields(&schema.fields, &schema.validators)
    }

    pub fn from_fields(
        fields: &[SchemaField],
        validators: &[GroupValidatorSpec],
    ) -> Result<Self, FormError> {
        let children = fields
            .iter()
            .map(|field| Ok((field.name.clone(), FormNode::from_field(field)?)))
            .collect::<Result<Vec<_>, FormError>>()?;
        Ok(Self::new(children, GroupValidator::compile_all(validators)))
    }

    pub fn children(&self) -> &[(String, FormNode)] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&FormNode> {
        self.children
            .iter()
            .find(|(child_name, _)| child_name == name)
            .map(|(_, node)| node)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut FormNode> {
        self.children
            .iter_mut()
            .find(|(child_name, _)| child_name == name)
            .map(|(_, node)| node)
    }

    /// Group-level faults only (children's faults are not included)
    pub fn faults(&self) -> &FaultSet {
        &self.faults
    }

    /// Rerun group validators; returns true if the fault set changed
    pub fn revalidate_own(&mut self) -> bool {
        let faults = validate_group(&self.validators, &self.children);
        let changed = faults != self.faults;
        self.faults = faults;
        changed
    }
}

/// Ordered list of groups sharing one item template
#[derive(Debug, Clone)]
pub struct FormList {
    items: Vec<FormNode>,
    template: FormGroup,
}

impl FormList {
    pub fn new(template: FormGroup, initial_items: usize) -> Self {
        let items = (0..initial_items)
            .map(|_| FormNode::Group(template.clone()))
            .collect();
        Self { items, template }
    }

    pub fn items(&self) -> &[FormNode] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&FormNode> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a fresh item built from the template; returns its index
    pub fn push_default(&mut self) -> usize {
        self.items.push(FormNode::Group(self.template.clone()));
        self.items.len() - 1
    }
}

/// A node reporting faults, as listed by [`FormNode::collect_invalid`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidNode {
    pub path: String,
    pub faults: FaultSet,
}

#[derive(Debug, Clone)]
pub enum FormNode {
    Field(FieldControl),
    Group(FormGroup),
    List(FormList),
}

impl FormNode {
    /// Compile one schema field (recursively for groups and lists)
    pub fn from_field(field: &SchemaField) -> Result<Self, FormError> {
        Ok(match &field.kind {
            FieldKind::Control {
                default,
                validators,
            } => Self::Field(FieldControl::new(
                default.clone(),
                Validator::compile_all(validators)?,
            )),
            FieldKind::Group { fields, validators } => {
                Self::Group(FormGroup::from_fields(fields, validators)?)
            }
            FieldKind::List {
                item_fields,
                item_validators,
                initial_items,
            } => {
                let template = FormGroup::from_fields(item_fields, item_validators)?;
                Self::List(FormList::new(template, *initial_items))
            }
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Field(_) => "field",
            Self::Group(_) => "group",
            Self::List(_) => "list",
        }
    }

    pub fn as_field(&self) -> Option<&FieldControl> {
        match self {
            Self::Field(control) => Some(control),
            _ => None,
        }
    }

    pub fn as_field_mut(&mut self) -> Option<&mut FieldControl> {
        match self {
            Self::Field(control) => Some(control),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&FormGroup> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&FormList> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut FormList> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    fn child(&self, segment: &str) -> Option<&FormNode> {
        match self {
            Self::Field(_) => None,
            Self::Group(group) => group.child(segment),
            Self::List(list) => segment.parse::<usize>().ok().and_then(|i| list.items.get(i)),
        }
    }

    fn child_mut(&mut self, segment: &str) -> Option<&mut FormNode> {
        match self {
            Self::Field(_) => None,
            Self::Group(group) => group.child_mut(segment),
            Self::List(list) => segment
                .parse::<usize>()
                .ok()
                .and_then(|i| list.items.get_mut(i)),
        }
    }

    pub fn find(&self, path: &FormPath) -> Option<&FormNode> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| node.child(segment))
    }

    pub fn find_mut(&mut self, path: &FormPath) -> Option<&mut FormNode> {
        let mut node = self;
        for segment in path.segments() {
            node = node.child_mut(segment)?;
        }
        Some(node)
    }

    pub fn field(&self, path: &FormPath) -> Result<&FieldControl, FormError> {
        self.find(path)
            .ok_or_else(|| FormError::path_not_found(path.to_string()))?
            .as_field()
            .ok_or_else(|| FormError::wrong_node_kind(path.to_string(), "field"))
    }

    pub fn field_mut(&mut self, path: &FormPath) -> Result<&mut FieldControl, FormError> {
        self.find_mut(path)
            .ok_or_else(|| FormError::path_not_found(path.to_string()))?
            .as_field_mut()
            .ok_or_else(|| FormError::wrong_node_kind(path.to_string(), "field"))
    }

    pub fn list_mut(&mut self, path: &FormPath) -> Result<&mut FormList, FormError> {
        self.find_mut(path)
            .ok_or_else(|| FormError::path_not_found(path.to_string()))?
            .as_list_mut()
            .ok_or_else(|| FormError::wrong_node_kind(path.to_string(), "list"))
    }

    /// Faults attached to this node itself; lists never carry their own
    pub fn faults(&self) -> &FaultSet {
        match self {
            Self::Field(control) => control.faults(),
            Self::Group(group) => group.faults(),
            Self::List(_) => &NO_FAULTS,
        }
    }

    /// Valid when neither this node nor any descendant has faults
    pub fn is_valid(&self) -> bool {
        match self {
            Self::Field(control) => control.is_valid(),
            Self::Group(group) => {
                group.faults.is_empty() && group.children.iter().all(|(_, node)| node.is_valid())
            }
            Self::List(list) => list.items.iter().all(FormNode::is_valid),
        }
    }

    /// Plain nested snapshot: groups become objects, lists become arrays
    pub fn value(&self) -> Value {
        match self {
            Self::Field(control) => control.value.clone(),
            Self::Group(group) => Value::Object(
                group
                    .children
                    .iter()
                    .map(|(name, node)| (name.clone(), node.value()))
                    .collect::<Map<String, Value>>(),
            ),
            Self::List(list) => Value::Array(list.items.iter().map(FormNode::value).collect()),
        }
    }

    /// Rerun every validator bottom-up
    pub fn revalidate_all(&mut self) {
        match self {
            Self::Field(control) => {
                control.revalidate();
            }
            Self::Group(group) => {
                for (_, node) in group.children.iter_mut() {
                    node.revalidate_all();
                }
                group.revalidate_own();
            }
            Self::List(list) => {
                for node in list.items.iter_mut() {
                    node.revalidate_all();
                }
            }
        }
    }

    /// Rerun group validators on every ancestor of `path`, deepest first
    ///
    /// Returns the ancestor paths whose group faults changed.
    pub fn revalidate_ancestors(&mut self, path: &FormPath) -> Vec<FormPath> {
        let mut changed = Vec::new();
        for ancestor in path.ancestors() {
            if let Some(Self::Group(group)) = self.find_mut(&ancestor) {
                if group.revalidate_own() {
                    changed.push(ancestor);
                }
            }
        }
        changed
    }

    /// Every node below (and including) `path` that carries its own faults
    pub fn collect_invalid(&self, path: &FormPath, out: &mut Vec<InvalidNode>) {
        if !self.faults().is_empty() {
            out.push(InvalidNode {
                path: path.to_string(),
                faults: self.faults().clone(),
            });
        }
        match self {
            Self::Field(_) => {}
            Self::Group(group) => {
                for (name, node) in &group.children {
                    node.collect_invalid(&path.child(name.as_str()), out);
                }
            }
            Self::List(list) => {
                for (index, node) in list.items.iter().enumerate() {
                    node.collect_invalid(&path.child(index.to_string()), out);
                }
            }
        }
    }

    /// Resolve a partial patch into the leaf assignments it names
    ///
    /// Only keys that exist in the tree are followed; list entries are
    /// matched by position and never created. Shape mismatches are skipped.
    pub fn patch_leaves(&self, patch: &Value, path: &FormPath, out: &mut Vec<(FormPath, Value)>) {
        match (self, patch) {
            (Self::Field(_), value) => out.push((path.clone(), value.clone())),
            (Self::Group(group), Value::Object(entries)) => {
                for (name, value) in entries {
                    if let Some(node) = group.child(name) {
                        node.patch_leaves(value, &path.child(name.as_str()), out);
                    }
                }
            }
            (Self::List(list), Value::Array(values)) => {
                for (index, (node, value)) in list.items.iter().zip(values).enumerate() {
                    node.patch_leaves(value, &path.child(index.to_string()), out);
                }
            }
            _ => {}
        }
    }
}
