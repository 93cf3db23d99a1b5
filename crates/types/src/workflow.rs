//! Workflow definition model consumed by the declaration generator.
//!
//! The structures mirror the authoring model of a stored workflow: its
//! context options, its variables, and its ordered activities. They preserve
//! authoring order (via `IndexMap` and `Vec`) so that generated declarations
//! follow the order the author wrote things in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::HostType;

/// Property name holding an activity's structured JSON schema payload.
pub const SCHEMA_PROPERTY: &str = "Schema";

/// Property name holding an activity's explicit target host type.
pub const TARGET_TYPE_PROPERTY: &str = "TargetType";

/// A stored workflow definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Identifier of the definition.
    #[serde(default)]
    pub definition_id: String,
    /// Optional human-readable name.
    #[serde(default)]
    pub name: Option<String>,
    /// Published version number.
    #[serde(default = "default_version")]
    pub version: i32,
    /// Workflow context configuration, when the workflow carries a context object.
    #[serde(default)]
    pub context_options: Option<WorkflowContextOptions>,
    /// Workflow variables in authoring order.
    #[serde(default)]
    pub variables: Variables,
    /// Ordered activities of the workflow.
    #[serde(default)]
    pub activities: Vec<ActivityDefinition>,
}

impl WorkflowDefinition {
    /// Returns the workflow context host type, if one is configured.
    pub fn context_type(&self) -> Option<&HostType> {
        self.context_options.as_ref()?.context_type.as_ref()
    }

    /// Iterates over the activities that carry a non-blank name.
    pub fn named_activities(&self) -> impl Iterator<Item = &ActivityDefinition> {
        self.activities.iter().filter(|activity| activity.is_named())
    }
}

fn default_version() -> i32 {
    1
}

/// Configuration of the workflow context object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowContextOptions {
    /// Host type of the context object.
    #[serde(default)]
    pub context_type: Option<HostType>,
    /// How often the context is loaded and saved.
    #[serde(default)]
    pub context_fidelity: ContextFidelity,
}

/// Loading granularity of the workflow context.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ContextFidelity {
    /// Load once per burst of execution.
    #[default]
    Burst,
    /// Load before every activity.
    Activity,
}

/// Ordered collection of workflow variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Variables {
    pub data: IndexMap<String, StoredVariable>,
}

impl Variables {
    /// Creates an empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, inferring its host type.
    pub fn set(&mut self, name: impl Into<String>, value: JsonValue) {
        self.data.insert(name.into(), StoredVariable::new(value));
    }

    /// Stores a value with an explicitly declared host type.
    pub fn set_typed(&mut self, name: impl Into<String>, value: JsonValue, host_type: HostType) {
        self.data.insert(name.into(), StoredVariable::typed(value, host_type));
    }

    /// Returns the stored variable for `name`.
    pub fn get(&self, name: &str) -> Option<&StoredVariable> {
        self.data.get(name)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates over variables in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &StoredVariable)> {
        self.data.iter()
    }
}

/// A stored variable value tagged with its host type.
///
/// The host type is resolved once, when the variable is stored: an explicit
/// type wins, otherwise it is inferred from the value. A null value stores
/// as [`HostType::Object`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "StoredVariableRecord", into = "StoredVariableRecord")]
pub struct StoredVariable {
    pub value: JsonValue,
    pub host_type: HostType,
}

impl StoredVariable {
    pub fn new(value: JsonValue) -> Self {
        let host_type = HostType::infer(&value);
        Self { value, host_type }
    }

    pub fn typed(value: JsonValue, host_type: HostType) -> Self {
        Self { value, host_type }
    }
}

#[derive(Serialize, Deserialize)]
struct StoredVariableRecord {
    #[serde(default)]
    value: JsonValue,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    host_type: Option<HostType>,
}

impl From<StoredVariableRecord> for StoredVariable {
    fn from(record: StoredVariableRecord) -> Self {
        match record.host_type {
            Some(host_type) => StoredVariable::typed(record.value, host_type),
            None => StoredVariable::new(record.value),
        }
    }
}

impl From<StoredVariable> for StoredVariableRecord {
    fn from(variable: StoredVariable) -> Self {
        Self {
            value: variable.value,
            host_type: Some(variable.host_type),
        }
    }
}

/// A single step of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDefinition {
    /// Unique identifier of the activity within its workflow.
    #[serde(default)]
    pub activity_id: String,
    /// Author-assigned name; only named activities are addressable from script.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional display label.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Activity type key used to resolve the activity's descriptor.
    pub r#type: String,
    /// Configured properties.
    #[serde(default)]
    pub properties: Vec<ActivityPropertyDefinition>,
}

impl ActivityDefinition {
    /// Creates an activity of the given type.
    pub fn new(activity_id: impl Into<String>, activity_type: impl Into<String>) -> Self {
        Self {
            activity_id: activity_id.into(),
            r#type: activity_type.into(),
            ..Default::default()
        }
    }

    /// Sets the activity's name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Appends a property with a single literal expression.
    pub fn with_literal_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(ActivityPropertyDefinition::literal(name, value));
        self
    }

    /// Returns the name as written when it is not blank.
    pub fn script_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.trim().is_empty())
    }

    /// True when the activity has a non-blank name.
    pub fn is_named(&self) -> bool {
        self.script_name().is_some()
    }

    /// Finds the first property with the given name.
    pub fn property(&self, name: &str) -> Option<&ActivityPropertyDefinition> {
        self.properties.iter().find(|property| property.name == name)
    }
}

/// A configured activity property, holding one expression per syntax.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPropertyDefinition {
    pub name: String,
    /// Expressions keyed by syntax (`Literal`, `JavaScript`, `Liquid`, ...).
    #[serde(default)]
    pub expressions: IndexMap<String, Option<String>>,
}

impl ActivityPropertyDefinition {
    /// Creates a property holding a single `Literal` expression.
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut expressions = IndexMap::new();
        expressions.insert("Literal".to_string(), Some(value.into()));
        Self {
            name: name.into(),
            expressions,
        }
    }

    /// Value of the first expression, if there is one and it is not null.
    pub fn first_value(&self) -> Option<&str> {
        self.expressions.first().and_then(|(_, value)| value.as_deref())
    }
}
