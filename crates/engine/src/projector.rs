//! Projection of host types onto script type names.

use wfscript_registry::TypeCatalog;
use wfscript_types::HostType;

/// The script language's universal type name.
pub const ANY_TYPE: &str = "any";

/// Structural types every scripting host declares, addressed by bare name.
pub const AMBIENT_TYPES: &[&str] = &[
    "ActivityExecutionContext",
    "WorkflowExecutionContext",
    "WorkflowInstance",
    "CultureInfo",
    "HttpRequestModel",
];

/// Maps host types to script type names.
///
/// Projection is total and deterministic: the same host type always yields
/// the same name, and anything without a mapping becomes [`ANY_TYPE`].
/// Structural types keep their bare name only when the scripting surface
/// declares them (an ambient type, or a type declared in the catalog).
#[derive(Debug, Clone, Default)]
pub struct TypeProjector {
    catalog: TypeCatalog,
}

impl TypeProjector {
    pub fn new(catalog: TypeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Returns the script type name for `host_type`.
    pub fn project(&self, host_type: &HostType) -> String {
        match host_type {
            HostType::Boolean => "boolean".to_string(),
            numeric if numeric.is_numeric() => "number".to_string(),
            HostType::Char | HostType::String | HostType::Guid | HostType::TimeSpan => "string".to_string(),
            HostType::DateTime | HostType::DateTimeOffset => "Date".to_string(),
            HostType::Nullable(inner) => self.project(inner),
            HostType::Array(element) => format!("Array<{}>", self.project(element)),
            HostType::Named(name) => {
                let bare_name = host_type.bare_name();
                if self.catalog.is_declared(name) || AMBIENT_TYPES.contains(&bare_name.as_str()) {
                    bare_name
                } else {
                    ANY_TYPE.to_string()
                }
            }
            _ => ANY_TYPE.to_string(),
        }
    }
}
