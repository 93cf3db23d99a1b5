//! Declaration document generation for a workflow's script scope.

use std::sync::Arc;

use futures_util::future::try_join_all;
use indexmap::{IndexMap, IndexSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wfscript_registry::{ActivityType, ActivityTypeResolver, RegistryError, TypeCatalog};
use wfscript_types::{ActivityDefinition, HostType, WorkflowDefinition};

use crate::{
    DeclarationOutput, GenerationError, TypeProjector,
    discriminator::instance_discriminator,
    policy::RenderPolicies,
    preamble::render_preamble,
    render::render_activity_type_block,
};

/// Name of the aggregate block listing every named activity.
pub const ACTIVITIES_INTERFACE: &str = "Activities";

/// How activities sharing a name are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateNamePolicy {
    /// Fail generation with [`GenerationError::DuplicateActivityName`].
    #[default]
    Reject,
    /// Keep the first activity with a given name and skip the rest.
    FirstSeenWins,
}

#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    pub duplicate_names: DuplicateNamePolicy,
}

/// A request for fresh script declarations.
///
/// Carries the workflow in scope, the projector used for every host type, and
/// the output the declarations are appended to. [`DeclarationGenerator::handle`]
/// only touches `output` when generation succeeds.
#[derive(Debug, Default)]
pub struct RenderingTypeDeclarations {
    pub workflow_definition: Option<WorkflowDefinition>,
    pub projector: TypeProjector,
    pub output: DeclarationOutput,
}

impl RenderingTypeDeclarations {
    pub fn new(workflow_definition: Option<WorkflowDefinition>, projector: TypeProjector) -> Self {
        Self {
            workflow_definition,
            projector,
            output: DeclarationOutput::new(),
        }
    }

    /// Script type name for a host type, as seen by this request.
    pub fn get_script_type(&self, host_type: &HostType) -> String {
        self.projector.project(host_type)
    }
}

/// Produces declaration documents for workflows.
///
/// Activity types are resolved through an [`ActivityTypeResolver`], so the
/// generator works against any registry implementation.
pub struct DeclarationGenerator {
    resolver: Arc<dyn ActivityTypeResolver>,
    catalog: TypeCatalog,
    policies: RenderPolicies,
    options: GeneratorOptions,
}

impl DeclarationGenerator {
    pub fn new(resolver: Arc<dyn ActivityTypeResolver>) -> Self {
        Self {
            resolver,
            catalog: TypeCatalog::new(),
            policies: RenderPolicies::default(),
            options: GeneratorOptions::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: TypeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_policies(mut self, policies: RenderPolicies) -> Self {
        self.policies = policies;
        self
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }

    /// A projector over this generator's type catalog.
    pub fn projector(&self) -> TypeProjector {
        TypeProjector::new(self.catalog.clone())
    }

    /// Generates the declaration document for `workflow` using this
    /// generator's own projector.
    pub async fn generate_with(
        &self,
        workflow: Option<&WorkflowDefinition>,
        cancellation: &CancellationToken,
    ) -> Result<DeclarationOutput, GenerationError> {
        self.generate(workflow, &self.projector(), cancellation).await
    }

    /// Handles a rendering request, appending to its output on success.
    ///
    /// On failure the request's output is left exactly as it was.
    pub async fn handle(&self, request: &mut RenderingTypeDeclarations, cancellation: &CancellationToken) -> Result<(), GenerationError> {
        let document = self
            .generate(request.workflow_definition.as_ref(), &request.projector, cancellation)
            .await?;
        request.output.append(document);
        Ok(())
    }

    /// Generates a fresh declaration document.
    ///
    /// Without a workflow only the preamble is produced. Otherwise the
    /// document lists the workflow context, the variables, one block per
    /// distinct activity type used by named activities, and the aggregate
    /// `Activities` block. Content order follows the workflow, never the
    /// order in which resolutions complete.
    ///
    /// # Errors
    /// - [`GenerationError::Registry`] when an activity type cannot be resolved or described.
    /// - [`GenerationError::Cancelled`] when `cancellation` fires first.
    /// - [`GenerationError::DuplicateActivityName`] under [`DuplicateNamePolicy::Reject`].
    pub async fn generate(
        &self,
        workflow: Option<&WorkflowDefinition>,
        projector: &TypeProjector,
        cancellation: &CancellationToken,
    ) -> Result<DeclarationOutput, GenerationError> {
        if cancellation.is_cancelled() {
            return Err(GenerationError::Cancelled);
        }

        let mut output = DeclarationOutput::new();
        render_preamble(&mut output);

        let Some(workflow) = workflow else {
            debug!("no workflow in scope, emitting preamble only");
            return Ok(output);
        };

        if let Some(context_type) = workflow.context_type() {
            output.append_line(format!("declare const workflowContext: {}", projector.project(context_type)));
        }

        for (name, variable) in workflow.variables.iter() {
            output.append_line(format!("declare const {}: {}", name, projector.project(&variable.host_type)));
        }

        let activities = self.select_named_activities(workflow)?;
        let activity_types = self.resolve_activity_types(&activities, cancellation).await?;

        let blocks = try_join_all(
            activity_types
                .values()
                .map(|activity_type| self.render_block(activity_type.as_ref(), projector, cancellation)),
        )
        .await?;
        for block in blocks {
            output.append(block);
        }

        output.append_line(format!("declare interface {ACTIVITIES_INTERFACE} {{"));
        for (name, activity) in &activities {
            let Some(activity_type) = activity_types.get(activity.r#type.as_str()) else {
                continue;
            };
            let type_name = activity_type.type_name();
            match instance_discriminator(activity, projector.catalog()) {
                Some(discriminator) => output.append_line(format!("{name}: {type_name}<{discriminator}>;")),
                None => output.append_line(format!("{name}: {type_name};")),
            }
        }
        output.append_line("}");
        output.append_line(format!("declare const activities: {ACTIVITIES_INTERFACE}"));

        info!(
            workflow = %workflow.definition_id,
            activity_types = activity_types.len(),
            named_activities = activities.len(),
            lines = output.line_count(),
            "generated script declarations"
        );
        Ok(output)
    }

    fn select_named_activities<'w>(
        &self,
        workflow: &'w WorkflowDefinition,
    ) -> Result<Vec<(&'w str, &'w ActivityDefinition)>, GenerationError> {
        let mut seen = IndexSet::new();
        let mut selected = Vec::new();
        for activity in workflow.named_activities() {
            let Some(name) = activity.script_name() else {
                continue;
            };
            if !seen.insert(name) {
                match self.options.duplicate_names {
                    DuplicateNamePolicy::Reject => {
                        return Err(GenerationError::DuplicateActivityName { name: name.to_string() });
                    }
                    DuplicateNamePolicy::FirstSeenWins => {
                        warn!(activity = name, activity_id = %activity.activity_id, "skipping activity with duplicate name");
                        continue;
                    }
                }
            }
            selected.push((name, activity));
        }
        Ok(selected)
    }

    /// Resolves each distinct activity type once, concurrently, keyed in
    /// first-seen order.
    async fn resolve_activity_types(
        &self,
        activities: &[(&str, &ActivityDefinition)],
        cancellation: &CancellationToken,
    ) -> Result<IndexMap<String, Arc<dyn ActivityType>>, GenerationError> {
        let distinct: IndexSet<&str> = activities.iter().map(|(_, activity)| activity.r#type.as_str()).collect();
        debug!(count = distinct.len(), "resolving activity types");

        let resolved = try_join_all(distinct.iter().map(|type_key| async move {
            let activity_type = tokio::select! {
                biased;
                _ = cancellation.cancelled() => Err(RegistryError::Cancelled),
                result = self.resolver.resolve_activity_type(type_key, cancellation) => result,
            }
            .inspect_err(|error| debug!(activity_type = *type_key, %error, "activity type resolution failed"))?;
            Ok::<_, GenerationError>((type_key.to_string(), activity_type))
        }))
        .await?;

        Ok(resolved.into_iter().collect())
    }

    async fn render_block(
        &self,
        activity_type: &dyn ActivityType,
        projector: &TypeProjector,
        cancellation: &CancellationToken,
    ) -> Result<DeclarationOutput, GenerationError> {
        let block = tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(RegistryError::Cancelled),
            result = render_activity_type_block(activity_type, projector, &self.policies, cancellation) => result,
        }?;
        Ok(block)
    }
}
