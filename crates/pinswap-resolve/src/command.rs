use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::{ResolutionError, ResolutionInvoker, ResolutionStep};

pub const DEFAULT_PACKAGE_CACHE_ENV: &str = "NUGET_PACKAGES";

/// Package cache directory handed to the resolution tool through its
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCache {
    pub env_var: String,
    pub dir: PathBuf,
}

impl PackageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            env_var: DEFAULT_PACKAGE_CACHE_ENV.to_string(),
            dir: dir.into(),
        }
    }
}

/// Runs the resolution tool as a child process, e.g. `dotnet restore`.
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    program: OsString,
    base_args: Vec<OsString>,
    package_cache: Option<PackageCache>,
}

impl CommandInvoker {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            package_cache: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_package_cache(mut self, package_cache: Option<PackageCache>) -> Self {
        self.package_cache = package_cache;
        self
    }

    pub fn build_command(&self, step: &ResolutionStep) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.base_args)
            .args(step.args())
            .current_dir(step.working_dir());
        if let Some(cache) = &self.package_cache {
            command.env(&cache.env_var, &cache.dir);
        }
        command
    }
}

impl ResolutionInvoker for CommandInvoker {
    fn invoke(&mut self, step: &ResolutionStep) -> Result<(), ResolutionError> {
        let output = self
            .build_command(step)
            .output()
            .map_err(|source| ResolutionError::Launch {
                program: self.program.to_string_lossy().into_owned(),
                working_dir: step.working_dir().to_path_buf(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
            tracing::debug!(target: "pinswap::resolve", "{line}");
        }

        if output.status.success() {
            return Ok(());
        }

        Err(ResolutionError::Failed {
            working_dir: step.working_dir().to_path_buf(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
