use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST_FILE: &str = "project.json";

/// Maps logical targets (directories relative to the repository root) to
/// manifest paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLocator {
    repo_root: PathBuf,
    manifest_file: String,
    targets: Vec<PathBuf>,
}

impl ManifestLocator {
    pub fn new(repo_root: impl Into<PathBuf>, manifest_file: impl Into<String>) -> Self {
        Self {
            repo_root: repo_root.into(),
            manifest_file: manifest_file.into(),
            targets: Vec::new(),
        }
    }

    pub fn with_targets<I, P>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn manifest_path(&self, target: &Path) -> PathBuf {
        self.repo_root.join(target).join(&self.manifest_file)
    }

    /// One path per target, in target order. Existence is not checked.
    pub fn locate(&self) -> Vec<PathBuf> {
        self.targets
            .iter()
            .map(|target| self.manifest_path(target))
            .collect()
    }
}
