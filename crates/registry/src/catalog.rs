//! Host type catalog.
//!
//! Activities may name an explicit target host type by its full name (for
//! example a `TargetType` of `Acme.Orders.Order, Acme.Orders`). The catalog
//! decides whether such a name refers to a type the host actually knows:
//! built-in primitives always resolve, structural types resolve only when a
//! manifest or the registry config declared them.

use indexmap::IndexSet;
use tracing::debug;
use wfscript_types::HostType;

use crate::ActivityManifest;

/// Set of host types that type references may resolve to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeCatalog {
    declared: IndexSet<String>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from the declared types of each manifest.
    pub fn from_manifests<'a>(manifests: impl IntoIterator<Item = &'a ActivityManifest>) -> Self {
        let mut catalog = Self::new();
        for manifest in manifests {
            catalog.extend(manifest.declared_types.iter().map(String::as_str));
        }
        catalog
    }

    /// Declares a structural type by full name. Returns `false` when the name
    /// does not parse or denotes a built-in type.
    pub fn declare(&mut self, full_name: &str) -> bool {
        match full_name.parse::<HostType>() {
            Ok(HostType::Named(name)) => self.declared.insert(name),
            Ok(_) => false,
            Err(error) => {
                debug!(type_name = %full_name, %error, "ignoring undeclarable host type");
                false
            }
        }
    }

    pub fn extend<'a>(&mut self, full_names: impl IntoIterator<Item = &'a str>) {
        for full_name in full_names {
            self.declare(full_name);
        }
    }

    /// True when `full_name` (without assembly qualification) was declared.
    pub fn is_declared(&self, full_name: &str) -> bool {
        self.declared.contains(full_name)
    }

    /// Declared structural type names in declaration order.
    pub fn declared_types(&self) -> impl Iterator<Item = &str> {
        self.declared.iter().map(String::as_str)
    }

    /// True when every part of `host_type` is known to the host.
    pub fn is_known(&self, host_type: &HostType) -> bool {
        match host_type {
            HostType::Array(inner) | HostType::Nullable(inner) => self.is_known(inner),
            HostType::Named(name) => self.is_declared(name),
            _ => true,
        }
    }

    /// Resolves a type reference to a known host type.
    ///
    /// Blank, malformed, and undeclared references resolve to `None`; this
    /// lookup never fails.
    pub fn resolve(&self, reference: &str) -> Option<HostType> {
        let host_type = reference.parse::<HostType>().ok()?;
        self.is_known(&host_type).then_some(host_type)
    }
}
