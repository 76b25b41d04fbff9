use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pinswap_core::{VersionOverride, DEFAULT_NAME_PREFIX};
use pinswap_cycle::{ManifestLocator, DEFAULT_MANIFEST_FILE};
use pinswap_resolve::{
    CommandInvoker, PackageCache, ResolutionPlan, DEFAULT_PACKAGE_CACHE_ENV,
};
use serde::Deserialize;

pub(crate) const DEFAULT_CONFIG_FILE: &str = "pinswap.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    repo_root: Option<PathBuf>,
    manifest_file: Option<String>,
    targets: Vec<PathBuf>,
    #[serde(rename = "override", default)]
    version_override: OverrideSection,
    resolver: ResolverSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OverrideSection {
    version: Option<String>,
    name_prefix: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResolverSection {
    program: Option<String>,
    args: Option<Vec<String>>,
    primary_dir: PathBuf,
    fallback_source: PathBuf,
    secondary_dir: Option<PathBuf>,
    package_cache: Option<PathBuf>,
    package_cache_env: Option<String>,
}

/// Configuration with defaults applied and every path made absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PinConfig {
    pub repo_root: PathBuf,
    pub manifest_file: String,
    pub targets: Vec<PathBuf>,
    pub override_version: Option<String>,
    pub name_prefix: String,
    pub resolver: ResolverConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolverConfig {
    pub program: String,
    pub args: Vec<String>,
    pub primary_dir: PathBuf,
    pub fallback_source: PathBuf,
    pub secondary_dir: Option<PathBuf>,
    pub package_cache: Option<PackageCache>,
}

pub(crate) fn load_config(path: &Path) -> Result<PinConfig> {
    let path = absolutize(path)?;
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config_dir = path.parent().unwrap_or_else(|| Path::new("/"));
    parse_config(&raw, config_dir)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

pub(crate) fn parse_config(raw: &str, config_dir: &Path) -> Result<PinConfig> {
    let file: ConfigFile = toml::from_str(raw).context("invalid pinswap configuration")?;
    if file.targets.is_empty() {
        anyhow::bail!("config must list at least one target");
    }

    let repo_root = match file.repo_root {
        Some(root) => config_dir.join(root),
        None => config_dir.to_path_buf(),
    };
    let resolver = file.resolver;
    let package_cache = resolver.package_cache.map(|dir| PackageCache {
        env_var: resolver
            .package_cache_env
            .unwrap_or_else(|| DEFAULT_PACKAGE_CACHE_ENV.to_string()),
        dir: repo_root.join(dir),
    });

    Ok(PinConfig {
        manifest_file: file
            .manifest_file
            .unwrap_or_else(|| DEFAULT_MANIFEST_FILE.to_string()),
        targets: file.targets,
        override_version: file.version_override.version,
        name_prefix: file
            .version_override
            .name_prefix
            .unwrap_or_else(|| DEFAULT_NAME_PREFIX.to_string()),
        resolver: ResolverConfig {
            program: resolver.program.unwrap_or_else(|| "dotnet".to_string()),
            args: resolver.args.unwrap_or_else(|| vec!["restore".to_string()]),
            primary_dir: repo_root.join(resolver.primary_dir),
            fallback_source: repo_root.join(resolver.fallback_source),
            secondary_dir: resolver.secondary_dir.map(|dir| repo_root.join(dir)),
            package_cache,
        },
        repo_root,
    })
}

impl PinConfig {
    pub(crate) fn locator(&self) -> ManifestLocator {
        ManifestLocator::new(&self.repo_root, self.manifest_file.clone())
            .with_targets(self.targets.iter().cloned())
    }

    pub(crate) fn plan(&self) -> ResolutionPlan {
        ResolutionPlan::standard(
            self.resolver.primary_dir.clone(),
            self.resolver.fallback_source.clone(),
            self.resolver.secondary_dir.clone(),
        )
    }

    pub(crate) fn command_invoker(&self) -> CommandInvoker {
        CommandInvoker::new(&self.resolver.program)
            .with_args(self.resolver.args.iter())
            .with_package_cache(self.resolver.package_cache.clone())
    }

    /// The command-line version wins over the configured one.
    pub(crate) fn version_override(&self, cli_version: Option<String>) -> Option<VersionOverride> {
        cli_version
            .or_else(|| self.override_version.clone())
            .map(|version| VersionOverride::new(version, self.name_prefix.clone()))
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}
