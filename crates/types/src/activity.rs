//! Activity type descriptors.

use serde::{Deserialize, Serialize};

use crate::HostType;

/// Metadata describing one kind of activity: its inputs and outputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDescriptor {
    /// Activity type key, also used as the declared type name.
    pub r#type: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Input properties in declaration order.
    #[serde(default)]
    pub input_properties: Vec<ActivityPropertyDescriptor>,
    /// Output properties in declaration order.
    #[serde(default)]
    pub output_properties: Vec<ActivityPropertyDescriptor>,
}

impl ActivityDescriptor {
    pub fn new(activity_type: impl Into<String>) -> Self {
        Self {
            r#type: activity_type.into(),
            ..Default::default()
        }
    }

    pub fn with_input(mut self, name: impl Into<String>, host_type: HostType) -> Self {
        self.input_properties.push(ActivityPropertyDescriptor::new(name, host_type));
        self
    }

    pub fn with_output(mut self, name: impl Into<String>, host_type: HostType) -> Self {
        self.output_properties.push(ActivityPropertyDescriptor::new(name, host_type));
        self
    }
}

/// A single input or output property of an activity type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPropertyDescriptor {
    pub name: String,
    /// Host type of the property value.
    pub r#type: HostType,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ActivityPropertyDescriptor {
    pub fn new(name: impl Into<String>, host_type: HostType) -> Self {
        Self {
            name: name.into(),
            r#type: host_type,
            label: None,
            hint: None,
        }
    }
}
