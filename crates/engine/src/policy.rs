//! Per-activity-type rendering policies.
//!
//! Most activity types render as a plain interface whose members return their
//! projected types. A few need a different shape (the HTTP endpoint exposes
//! its request payload through a generic parameter). Those cases are data in a
//! [`RenderPolicies`] table rather than branches in the renderer.

use std::collections::HashMap;

use indexmap::IndexMap;

/// Activity type rendered with a generic request payload.
pub const HTTP_ENDPOINT_TYPE: &str = "HttpEndpoint";

/// Shape of a single accessor's return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyShape {
    /// `Name(): <projected>;`
    #[default]
    Projected,
    /// `Name(): <projected><T>;` using the block's generic parameter.
    WrapGeneric,
}

/// How one activity type's declaration block is shaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPolicy {
    /// Generic parameter declared on the block, if any.
    pub generic_parameter: Option<String>,
    /// Accessor shapes keyed by property name. Unlisted properties are projected.
    pub property_overrides: IndexMap<String, PropertyShape>,
}

impl RenderPolicy {
    /// A policy declaring one generic parameter.
    pub fn generic(parameter: impl Into<String>) -> Self {
        Self {
            generic_parameter: Some(parameter.into()),
            property_overrides: IndexMap::new(),
        }
    }

    pub fn with_override(mut self, property_name: impl Into<String>, shape: PropertyShape) -> Self {
        self.property_overrides.insert(property_name.into(), shape);
        self
    }

    /// Shape for `property_name`. Wrapping needs a generic parameter to wrap with.
    pub fn shape_for(&self, property_name: &str) -> PropertyShape {
        match self.property_overrides.get(property_name) {
            Some(PropertyShape::WrapGeneric) if self.generic_parameter.is_some() => PropertyShape::WrapGeneric,
            _ => PropertyShape::Projected,
        }
    }
}

/// Rendering policies keyed by activity type name.
#[derive(Debug, Clone)]
pub struct RenderPolicies {
    policies: HashMap<String, RenderPolicy>,
}

impl Default for RenderPolicies {
    fn default() -> Self {
        let mut policies = Self::empty();
        policies.insert(
            HTTP_ENDPOINT_TYPE,
            RenderPolicy::generic("T").with_override("Output", PropertyShape::WrapGeneric),
        );
        policies
    }
}

impl RenderPolicies {
    /// A table without any special cases.
    pub fn empty() -> Self {
        Self { policies: HashMap::new() }
    }

    pub fn insert(&mut self, activity_type: impl Into<String>, policy: RenderPolicy) -> Option<RenderPolicy> {
        self.policies.insert(activity_type.into(), policy)
    }

    pub fn get(&self, activity_type: &str) -> Option<&RenderPolicy> {
        self.policies.get(activity_type)
    }
}
