//! Host-side value types.
//!
//! A [`HostType`] names the runtime type of a value inside the workflow engine
//! (a variable's stored value, an activity property, the workflow context).
//! Host types are written the way workflow authors and activity manifests
//! spell them (`System.Int32`, `int`, `System.String[]`,
//! `System.Nullable<System.Int32>`, `Acme.Orders.Order, Acme.Orders`) and are
//! serialized back in their canonical form.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Runtime type of a value inside the workflow engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HostType {
    Boolean,
    Char,
    String,
    Byte,
    SByte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    Guid,
    /// The universal object type; also used for variables stored without a value.
    Object,
    /// A structured JSON document.
    Json,
    /// A sequence of the element type.
    Array(Box<HostType>),
    /// An optional value of the inner type.
    Nullable(Box<HostType>),
    /// A structural type identified by its full name (for example `Acme.Orders.Order`).
    Named(String),
}

/// Error surfaced when a host type name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostTypeParseError {
    #[error("host type name is empty")]
    Empty,
    #[error("invalid host type name '{0}'")]
    InvalidName(String),
    #[error("unbalanced generic arguments in host type name '{0}'")]
    UnbalancedGenerics(String),
}

const PRIMITIVE_NAMES: &[(&str, &str, HostType)] = &[
    ("System.Boolean", "bool", HostType::Boolean),
    ("System.Char", "char", HostType::Char),
    ("System.String", "string", HostType::String),
    ("System.Byte", "byte", HostType::Byte),
    ("System.SByte", "sbyte", HostType::SByte),
    ("System.Int16", "short", HostType::Int16),
    ("System.UInt16", "ushort", HostType::UInt16),
    ("System.Int32", "int", HostType::Int32),
    ("System.UInt32", "uint", HostType::UInt32),
    ("System.Int64", "long", HostType::Int64),
    ("System.UInt64", "ulong", HostType::UInt64),
    ("System.Single", "float", HostType::Single),
    ("System.Double", "double", HostType::Double),
    ("System.Decimal", "decimal", HostType::Decimal),
    ("System.DateTime", "datetime", HostType::DateTime),
    ("System.DateTimeOffset", "datetimeoffset", HostType::DateTimeOffset),
    ("System.TimeSpan", "timespan", HostType::TimeSpan),
    ("System.Guid", "guid", HostType::Guid),
    ("System.Object", "object", HostType::Object),
    ("System.Text.Json.Nodes.JsonObject", "json", HostType::Json),
];

/// Generic wrappers that denote a sequence of their single type argument.
const SEQUENCE_WRAPPERS: &[&str] = &["List", "IList", "ICollection", "IEnumerable", "IReadOnlyList", "IReadOnlyCollection", "Array"];

impl HostType {
    /// Infers the host type of a stored JSON value.
    ///
    /// Absent values (`null`) degrade to [`HostType::Object`].
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Null => HostType::Object,
            Value::Bool(_) => HostType::Boolean,
            Value::Number(number) if number.is_i64() || number.is_u64() => HostType::Int64,
            Value::Number(_) => HostType::Double,
            Value::String(_) => HostType::String,
            Value::Array(_) => HostType::Array(Box::new(HostType::Object)),
            Value::Object(_) => HostType::Json,
        }
    }

    /// Returns the short host name of the type, without namespace or
    /// assembly qualification (`Int32`, `String[]`, `Order`).
    pub fn bare_name(&self) -> String {
        match self {
            HostType::Array(element) => format!("{}[]", element.bare_name()),
            HostType::Nullable(inner) => inner.bare_name(),
            HostType::Named(name) => {
                let head = name.split('<').next().unwrap_or(name);
                let bare = head.rsplit(['.', '+']).next().unwrap_or(head);
                format!("{}{}", bare, &name[head.len()..])
            }
            primitive => {
                let canonical = primitive.canonical_primitive_name();
                canonical.rsplit('.').next().unwrap_or(canonical).to_string()
            }
        }
    }

    /// True for the integral, floating point, and decimal types.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            HostType::Byte
                | HostType::SByte
                | HostType::Int16
                | HostType::UInt16
                | HostType::Int32
                | HostType::UInt32
                | HostType::Int64
                | HostType::UInt64
                | HostType::Single
                | HostType::Double
                | HostType::Decimal
        )
    }

    fn canonical_primitive_name(&self) -> &'static str {
        PRIMITIVE_NAMES
            .iter()
            .find(|(_, _, host_type)| host_type == self)
            .map(|(canonical, _, _)| *canonical)
            .unwrap_or("System.Object")
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Array(element) => write!(f, "{}[]", element),
            HostType::Nullable(inner) => write!(f, "System.Nullable<{}>", inner),
            HostType::Named(name) => f.write_str(name),
            primitive => f.write_str(primitive.canonical_primitive_name()),
        }
    }
}

impl FromStr for HostType {
    type Err = HostTypeParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let name = strip_assembly_qualifier(text.trim()).trim();
        if name.is_empty() {
            return Err(HostTypeParseError::Empty);
        }

        if let Some(element) = name.strip_suffix("[]") {
            return Ok(HostType::Array(Box::new(element.parse()?)));
        }
        if let Some(inner) = name.strip_suffix('?') {
            return Ok(HostType::Nullable(Box::new(inner.parse()?)));
        }
        if name.ends_with('>') {
            return parse_generic(name);
        }

        if let Some((_, _, host_type)) = PRIMITIVE_NAMES
            .iter()
            .find(|(canonical, alias, _)| *canonical == name || alias.eq_ignore_ascii_case(name) || short_name(canonical) == name)
        {
            return Ok(host_type.clone());
        }
        if matches!(name, "JObject" | "JsonElement" | "Newtonsoft.Json.Linq.JObject" | "System.Text.Json.JsonElement") {
            return Ok(HostType::Json);
        }

        if is_valid_type_name(name) {
            Ok(HostType::Named(name.to_string()))
        } else {
            Err(HostTypeParseError::InvalidName(name.to_string()))
        }
    }
}

impl TryFrom<String> for HostType {
    type Error = HostTypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HostType> for String {
    fn from(value: HostType) -> Self {
        value.to_string()
    }
}

fn parse_generic(name: &str) -> Result<HostType, HostTypeParseError> {
    let open = name.find('<').ok_or_else(|| HostTypeParseError::UnbalancedGenerics(name.to_string()))?;
    let head = &name[..open];
    let arguments = split_top_level(&name[open + 1..name.len() - 1], ',')
        .ok_or_else(|| HostTypeParseError::UnbalancedGenerics(name.to_string()))?;

    if !is_valid_type_name(head) {
        return Err(HostTypeParseError::InvalidName(name.to_string()));
    }

    match (short_name(head), arguments.as_slice()) {
        ("Nullable", [inner]) => Ok(HostType::Nullable(Box::new(inner.parse()?))),
        (wrapper, [element]) if SEQUENCE_WRAPPERS.contains(&wrapper) => Ok(HostType::Array(Box::new(element.parse()?))),
        _ => {
            for argument in &arguments {
                argument.parse::<HostType>()?;
            }
            Ok(HostType::Named(name.to_string()))
        }
    }
}

/// Drops the assembly qualification that follows the first top-level comma.
fn strip_assembly_qualifier(name: &str) -> &str {
    let mut depth = 0usize;
    for (index, character) in name.char_indices() {
        match character {
            '<' | '[' => depth += 1,
            '>' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return &name[..index],
            _ => {}
        }
    }
    name
}

/// Splits on `separator` outside of nested generic arguments. Returns `None` when brackets do not balance.
fn split_top_level(text: &str, separator: char) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (index, character) in text.char_indices() {
        match character {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth < 0 {
                    return None;
                }
            }
            c if c == separator && depth == 0 => {
                parts.push(text[start..index].trim());
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(text[start..].trim());
    Some(parts)
}

fn short_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn is_valid_type_name(name: &str) -> bool {
    let mut segments = name.split(['.', '+']);
    segments.all(|segment| {
        let mut characters = segment.chars();
        matches!(characters.next(), Some(first) if first.is_alphabetic() || first == '_')
            && characters.all(|c| c.is_alphanumeric() || c == '_' || c == '`')
    })
}
