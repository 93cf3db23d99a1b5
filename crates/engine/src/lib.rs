//! # wfscript engine
//!
//! Generates the script declaration document for a workflow: the built-in
//! globals every script can use, the workflow's context and variables, one
//! interface per activity type used by named activities, and the aggregate
//! `Activities` interface addressing each named activity.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tokio_util::sync::CancellationToken;
//! use wfscript_engine::{DeclarationGenerator, parse_workflow_file};
//! use wfscript_registry::ActivityTypeRegistry;
//! use wfscript_types::{ActivityDescriptor, HostType};
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # runtime.block_on(async {
//! let temp_dir = tempfile::tempdir().unwrap();
//! let workflow_path = temp_dir.path().join("workflow.yaml");
//! std::fs::write(&workflow_path, r#"
//! definitionId: "notify"
//! activities:
//!   - activityId: "a1"
//!     name: "SendEmail"
//!     type: "EmailActivity"
//! "#).unwrap();
//!
//! let registry = ActivityTypeRegistry::new();
//! registry
//!     .register_descriptor(ActivityDescriptor::new("EmailActivity").with_input("To", HostType::String))
//!     .await;
//!
//! let bundle = parse_workflow_file(&workflow_path).unwrap();
//! let generator = DeclarationGenerator::new(Arc::new(registry));
//! let document = generator
//!     .generate_with(bundle.get_or_first(None), &CancellationToken::new())
//!     .await
//!     .unwrap();
//! assert!(document.as_str().contains("SendEmail: EmailActivity;"));
//! # });
//! ```
//!
//! ## Modules
//!
//! - **`projector`**: host type to script type projection
//! - **`discriminator`**: per-activity generic arguments (schema, target type)
//! - **`policy`**: per-activity-type rendering policies
//! - **`render`**: activity type declaration blocks
//! - **`generator`**: the document generator and rendering requests

use std::{fs, path::Path};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use wfscript_types::WorkflowDefinition;
use wfscript_util::non_blank;

pub mod discriminator;
pub mod error;
pub mod generator;
pub mod model;
pub mod output;
pub mod policy;
pub mod preamble;
pub mod projector;
pub mod render;

pub use discriminator::{SCHEMA_DISCRIMINATOR, instance_discriminator, schema_discriminator, target_type_discriminator};
pub use error::GenerationError;
pub use generator::{ACTIVITIES_INTERFACE, DeclarationGenerator, DuplicateNamePolicy, GeneratorOptions, RenderingTypeDeclarations};
pub use model::WorkflowBundle;
pub use output::DeclarationOutput;
pub use policy::{HTTP_ENDPOINT_TYPE, PropertyShape, RenderPolicies, RenderPolicy};
pub use preamble::{AMBIENT_CONSTANTS, BUILTIN_FUNCTIONS, preamble, render_preamble};
pub use projector::{AMBIENT_TYPES, ANY_TYPE, TypeProjector};
pub use render::render_activity_type_block;

/// Loads a workflow document, YAML or JSON.
///
/// Accepts either a single workflow definition or a multi-workflow document
/// with definitions under a `workflows` key. A single definition is keyed by
/// its definition id, then its name, then `default`.
///
/// # Errors
/// Fails when the file cannot be read or matches neither shape.
pub fn parse_workflow_file(file_path: impl AsRef<Path>) -> Result<WorkflowBundle> {
    let file_path = file_path.as_ref();
    let file_content = fs::read(file_path).with_context(|| format!("Failed to read workflow file: {}", file_path.display()))?;

    let content_string = String::from_utf8_lossy(&file_content);

    // Multi documents first, so they are not accepted as single definitions
    // with every field defaulted.
    #[derive(Deserialize)]
    struct MultiWorkflowDocument {
        workflows: IndexMap<String, WorkflowDefinition>,
    }

    if let Ok(multi_workflow_document) = serde_yaml::from_str::<MultiWorkflowDocument>(&content_string) {
        return Ok(WorkflowBundle {
            workflows: multi_workflow_document.workflows,
        });
    }

    let workflow_definition = serde_yaml::from_str::<WorkflowDefinition>(&content_string).with_context(|| {
        format!(
            "Unsupported workflow document format in {}. Expected a workflow definition or workflows under a 'workflows' key",
            file_path.display()
        )
    })?;

    let workflow_key = non_blank(Some(workflow_definition.definition_id.as_str()))
        .or_else(|| non_blank(workflow_definition.name.as_deref()))
        .unwrap_or("default")
        .to_string();

    let mut workflows = IndexMap::new();
    workflows.insert(workflow_key, workflow_definition);
    Ok(WorkflowBundle { workflows })
}
