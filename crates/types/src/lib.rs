//! Shared type definitions for wfscript.
//!
//! The workflow definition model, host value types, and activity descriptors
//! are defined here so the registry, engine, and CLI agree on one shape.

pub mod activity;
pub mod host_type;
pub mod workflow;

pub use activity::{ActivityDescriptor, ActivityPropertyDescriptor};
pub use host_type::{HostType, HostTypeParseError};
pub use workflow::{
    ActivityDefinition, ActivityPropertyDefinition, ContextFidelity, SCHEMA_PROPERTY, StoredVariable, TARGET_TYPE_PROPERTY, Variables,
    WorkflowContextOptions, WorkflowDefinition,
};
