//! Declaration blocks for activity types.

use tokio_util::sync::CancellationToken;
use wfscript_registry::{ActivityType, RegistryError};
use wfscript_types::ActivityPropertyDescriptor;

use crate::{
    DeclarationOutput, TypeProjector,
    policy::{PropertyShape, RenderPolicies, RenderPolicy},
};

/// Renders the interface block for one activity type.
///
/// The block is named after the type's name and lists every input property,
/// then every output property, as a zero-argument accessor. The type's
/// [`RenderPolicy`] (if any) adds a generic parameter and reshapes selected
/// accessors.
///
/// # Errors
/// Propagates failures of the type's `describe` call, including cancellation.
pub async fn render_activity_type_block(
    activity_type: &dyn ActivityType,
    projector: &TypeProjector,
    policies: &RenderPolicies,
    cancellation: &CancellationToken,
) -> Result<DeclarationOutput, RegistryError> {
    let type_name = activity_type.type_name();
    let descriptor = activity_type.describe(cancellation).await?;
    let default_policy = RenderPolicy::default();
    let policy = policies.get(type_name).unwrap_or(&default_policy);

    let mut block = DeclarationOutput::new();
    match &policy.generic_parameter {
        Some(parameter) => block.append_line(format!("declare interface {type_name}<{parameter}> {{")),
        None => block.append_line(format!("declare interface {type_name} {{")),
    }

    for property in descriptor.input_properties.iter().chain(&descriptor.output_properties) {
        block.append_line(render_accessor(property, projector, policy));
    }

    block.append_line("}");
    Ok(block)
}

fn render_accessor(property: &ActivityPropertyDescriptor, projector: &TypeProjector, policy: &RenderPolicy) -> String {
    let script_type = projector.project(&property.r#type);
    match (policy.shape_for(&property.name), &policy.generic_parameter) {
        (PropertyShape::WrapGeneric, Some(parameter)) => format!("{}(): {}<{}>;", property.name, script_type, parameter),
        _ => format!("{}(): {};", property.name, script_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfscript_registry::DescribedActivityType;
    use wfscript_types::{ActivityDescriptor, HostType};

    #[tokio::test]
    async fn renders_inputs_before_outputs() {
        let activity_type = DescribedActivityType::new(
            ActivityDescriptor::new("EmailActivity")
                .with_output("MessageId", HostType::String)
                .with_input("To", HostType::String)
                .with_input("Attempts", HostType::Int32),
        );

        let block = render_activity_type_block(&activity_type, &TypeProjector::default(), &RenderPolicies::default(), &CancellationToken::new())
            .await
            .expect("render block");

        assert_eq!(
            block.as_str(),
            "declare interface EmailActivity {\nTo(): string;\nAttempts(): number;\nMessageId(): string;\n}\n"
        );
    }

    #[tokio::test]
    async fn http_endpoint_output_is_parameterized() {
        let activity_type = DescribedActivityType::new(
            ActivityDescriptor::new("HttpEndpoint")
                .with_input("Path", HostType::String)
                .with_output("Output", HostType::String),
        );

        let block = render_activity_type_block(&activity_type, &TypeProjector::default(), &RenderPolicies::default(), &CancellationToken::new())
            .await
            .expect("render block");

        assert_eq!(block.as_str(), "declare interface HttpEndpoint<T> {\nPath(): string;\nOutput(): string<T>;\n}\n");
    }

    #[tokio::test]
    async fn empty_policy_table_renders_plain_blocks() {
        let activity_type = DescribedActivityType::new(ActivityDescriptor::new("HttpEndpoint").with_output("Output", HostType::String));

        let block = render_activity_type_block(&activity_type, &TypeProjector::default(), &RenderPolicies::empty(), &CancellationToken::new())
            .await
            .expect("render block");

        assert_eq!(block.as_str(), "declare interface HttpEndpoint {\nOutput(): string;\n}\n");
    }
}
