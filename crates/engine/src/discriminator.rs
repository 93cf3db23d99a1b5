//! Generic arguments attached to individual activity instances.
//!
//! Some activities carry a structured JSON schema, others an explicit target
//! host type. Either one parameterizes the activity's declared type in the
//! aggregate `Activities` block (`Parse: ReadJson<Json>;`). Absence is never
//! an error; it just means the bare activity type is used.

use std::borrow::Cow;

use wfscript_registry::TypeCatalog;
use wfscript_types::{ActivityDefinition, SCHEMA_PROPERTY, TARGET_TYPE_PROPERTY};
use wfscript_util::non_blank;

/// Generic argument used for every activity that carries a schema.
pub const SCHEMA_DISCRIMINATOR: &str = "Json";

/// Returns [`SCHEMA_DISCRIMINATOR`] when the activity's `Schema` property has a
/// non-blank first expression. The schema content itself is not inspected.
pub fn schema_discriminator(activity: &ActivityDefinition) -> Option<&'static str> {
    let schema = activity.property(SCHEMA_PROPERTY)?;
    non_blank(schema.first_value()).map(|_| SCHEMA_DISCRIMINATOR)
}

/// Returns the bare host name of the activity's `TargetType`, when that
/// reference resolves in `catalog`.
pub fn target_type_discriminator(activity: &ActivityDefinition, catalog: &TypeCatalog) -> Option<String> {
    let target_type = activity.property(TARGET_TYPE_PROPERTY)?;
    let reference = target_type.first_value()?;
    catalog.resolve(reference).map(|host_type| host_type.bare_name())
}

/// Discriminator for an activity instance. The schema wins over the target type.
pub fn instance_discriminator(activity: &ActivityDefinition, catalog: &TypeCatalog) -> Option<Cow<'static, str>> {
    schema_discriminator(activity)
        .map(Cow::Borrowed)
        .or_else(|| target_type_discriminator(activity, catalog).map(Cow::Owned))
}
