pub const DEFAULT_NAME_PREFIX: &str = "NuGet.";

/// Replacement version and the rule selecting which dependency entries get it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOverride {
    version: String,
    name_prefix: String,
}

impl VersionOverride {
    pub fn new(version: impl Into<String>, name_prefix: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            name_prefix: name_prefix.into(),
        }
    }

    pub fn with_default_prefix(version: impl Into<String>) -> Self {
        Self::new(version, DEFAULT_NAME_PREFIX)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    /// Case-sensitive prefix match on the dependency name.
    pub fn matches(&self, dependency_name: &str) -> bool {
        dependency_name.starts_with(&self.name_prefix)
    }
}
