use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::ResolutionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Verbose,
}

impl Verbosity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verbose => "verbose",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveFlag {
    Verbosity(Verbosity),
    DisableParallel,
    FallbackSource(PathBuf),
    InferRuntimes,
}

impl ResolveFlag {
    pub fn to_args(&self) -> Vec<OsString> {
        match self {
            Self::Verbosity(level) => vec!["--verbosity".into(), level.as_str().into()],
            Self::DisableParallel => vec!["--disable-parallel".into()],
            Self::FallbackSource(path) => {
                vec!["--fallbacksource".into(), path.as_os_str().to_os_string()]
            }
            Self::InferRuntimes => vec!["--infer-runtimes".into()],
        }
    }
}

/// One invocation of the resolution tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionStep {
    working_dir: PathBuf,
    flags: Vec<ResolveFlag>,
}

impl ResolutionStep {
    pub fn new(working_dir: impl Into<PathBuf>, flags: Vec<ResolveFlag>) -> Self {
        Self {
            working_dir: working_dir.into(),
            flags,
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn flags(&self) -> &[ResolveFlag] {
        &self.flags
    }

    pub fn args(&self) -> Vec<OsString> {
        self.flags.iter().flat_map(ResolveFlag::to_args).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionPlan {
    steps: Vec<ResolutionStep>,
}

impl ResolutionPlan {
    pub fn new(steps: Vec<ResolutionStep>) -> Self {
        Self { steps }
    }

    /// Primary directory restores verbosely, serially, with an extra package
    /// source; the optional secondary directory restores verbosely and infers
    /// runtime identifiers.
    pub fn standard(
        primary_dir: impl Into<PathBuf>,
        fallback_source: impl Into<PathBuf>,
        secondary_dir: Option<PathBuf>,
    ) -> Self {
        let primary_flags = vec![
            ResolveFlag::Verbosity(Verbosity::Verbose),
            ResolveFlag::DisableParallel,
            ResolveFlag::FallbackSource(fallback_source.into()),
        ];

        let mut steps = vec![ResolutionStep::new(primary_dir, primary_flags)];
        if let Some(secondary_dir) = secondary_dir {
            steps.push(ResolutionStep::new(
                secondary_dir,
                vec![
                    ResolveFlag::Verbosity(Verbosity::Verbose),
                    ResolveFlag::InferRuntimes,
                ],
            ));
        }
        Self { steps }
    }

    pub fn steps(&self) -> &[ResolutionStep] {
        &self.steps
    }
}

pub trait ResolutionInvoker {
    /// Runs one step to completion. Must block until the tool exits.
    fn invoke(&mut self, step: &ResolutionStep) -> Result<(), ResolutionError>;
}

impl<T: ResolutionInvoker + ?Sized> ResolutionInvoker for &mut T {
    fn invoke(&mut self, step: &ResolutionStep) -> Result<(), ResolutionError> {
        (**self).invoke(step)
    }
}

/// Runs every step in order and stops at the first failure.
pub fn run_plan<I>(plan: &ResolutionPlan, invoker: &mut I) -> Result<(), ResolutionError>
where
    I: ResolutionInvoker + ?Sized,
{
    for (index, step) in plan.steps().iter().enumerate() {
        tracing::info!(
            step = index + 1,
            total = plan.steps().len(),
            working_dir = %step.working_dir().display(),
            "running dependency resolution"
        );
        invoker.invoke(step)?;
    }
    Ok(())
}
