use serde_json::{Map, Value};

use crate::error::ManifestError;
use crate::version_override::VersionOverride;

pub const DEPENDENCIES_KEY: &str = "dependencies";
pub const VERSION_KEY: &str = "version";

const UTF8_BOM: char = '\u{feff}';

/// Shape of a dependency's version value.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionSpec {
    /// `"Name": "1.0.0"`
    Direct(String),
    /// `"Name": { "version": "1.0.0", "type": "build" }`; the whole object is
    /// kept so sibling fields and their order survive a rewrite.
    Nested(Map<String, Value>),
}

impl VersionSpec {
    /// Classifies a raw JSON value, handing it back unchanged when it is
    /// neither a string nor an object.
    pub fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::String(version) => Ok(Self::Direct(version)),
            Value::Object(fields) => Ok(Self::Nested(fields)),
            other => Err(other),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Direct(version) => Value::String(version),
            Self::Nested(fields) => Value::Object(fields),
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Direct(version) => Some(version.as_str()),
            Self::Nested(fields) => fields.get(VERSION_KEY).and_then(Value::as_str),
        }
    }

    /// Replaces the version while keeping the tag and every sibling field.
    pub fn with_version(self, version: &str) -> Self {
        match self {
            Self::Direct(_) => Self::Direct(version.to_string()),
            Self::Nested(mut fields) => {
                fields.insert(VERSION_KEY.to_string(), Value::String(version.to_string()));
                Self::Nested(fields)
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Direct(_) => "direct",
            Self::Nested(_) => "nested",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DependencyEntry {
    pub name: String,
    pub spec: VersionSpec,
}

/// A parsed manifest. Key order of every object is kept as read.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    root: Map<String, Value>,
}

impl ManifestDocument {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        let text = std::str::from_utf8(bytes).map_err(ManifestError::Encoding)?;
        let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
        Self::from_text(text)
    }

    pub fn from_text(text: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(text).map_err(ManifestError::Parse)?;
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ManifestError::schema(format!(
                "manifest root must be an object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Entries with a recognised version shape, in document order.
    pub fn dependencies(&self) -> Result<Vec<DependencyEntry>, ManifestError> {
        let dependencies = self.dependencies_map()?;
        Ok(dependencies
            .iter()
            .filter_map(|(name, value)| {
                VersionSpec::from_value(value.clone())
                    .ok()
                    .map(|spec| DependencyEntry {
                        name: name.clone(),
                        spec,
                    })
            })
            .collect())
    }

    /// Rewrites every matching dependency and returns the rewritten names.
    ///
    /// Nothing is modified when an error is returned.
    pub fn apply_override(
        &mut self,
        version_override: &VersionOverride,
    ) -> Result<Vec<String>, ManifestError> {
        let dependencies = self.dependencies_map()?;
        for (name, value) in dependencies {
            if version_override.matches(name) && !matches!(value, Value::String(_) | Value::Object(_))
            {
                return Err(ManifestError::schema(format!(
                    "dependency '{name}' has an unsupported version shape ({})",
                    json_type_name(value)
                )));
            }
        }

        let dependencies = self.dependencies_map_mut()?;
        let mut rewritten = Vec::new();
        for (name, value) in dependencies.iter_mut() {
            if !version_override.matches(name) {
                continue;
            }
            let spec = VersionSpec::from_value(std::mem::take(value)).map_err(|raw| {
                ManifestError::schema(format!(
                    "dependency '{name}' has an unsupported version shape ({})",
                    json_type_name(&raw)
                ))
            })?;
            *value = spec.with_version(version_override.version()).into_value();
            rewritten.push(name.clone());
        }
        Ok(rewritten)
    }

    /// Two-space indented JSON, UTF-8 without BOM, no trailing newline.
    pub fn to_vec_pretty(&self) -> Result<Vec<u8>, ManifestError> {
        serde_json::to_vec_pretty(&self.root).map_err(ManifestError::Serialize)
    }

    fn dependencies_map(&self) -> Result<&Map<String, Value>, ManifestError> {
        match self.root.get(DEPENDENCIES_KEY) {
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(ManifestError::schema(format!(
                "'{DEPENDENCIES_KEY}' must be an object, found {}",
                json_type_name(other)
            ))),
            None => Err(ManifestError::schema(format!(
                "missing '{DEPENDENCIES_KEY}' object"
            ))),
        }
    }

    fn dependencies_map_mut(&mut self) -> Result<&mut Map<String, Value>, ManifestError> {
        match self.root.get_mut(DEPENDENCIES_KEY) {
            Some(Value::Object(map)) => Ok(map),
            _ => Err(ManifestError::schema(format!(
                "missing '{DEPENDENCIES_KEY}' object"
            ))),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
