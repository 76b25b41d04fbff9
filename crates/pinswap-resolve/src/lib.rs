//! Contract for the external dependency-resolution tool.
//!
//! Steps always run one after another in plan order. The tool's own
//! parallelism is turned off on the primary step so two restores never
//! contend over the package cache directory.

mod command;
mod error;
mod plan;

pub use command::{CommandInvoker, PackageCache, DEFAULT_PACKAGE_CACHE_ENV};
pub use error::ResolutionError;
pub use plan::{run_plan, ResolutionInvoker, ResolutionPlan, ResolutionStep, ResolveFlag, Verbosity};

#[cfg(test)]
mod tests;
