use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("failed launching resolution tool '{program}' in {}", .working_dir.display())]
    Launch {
        program: String,
        working_dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("resolution failed in {} ({status}): {stderr}", .working_dir.display())]
    Failed {
        working_dir: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    /// Failure reported by an invoker that does not run a subprocess.
    #[error("resolution failed in {}: {reason}", .working_dir.display())]
    Rejected { working_dir: PathBuf, reason: String },
}

impl ResolutionError {
    pub fn working_dir(&self) -> &std::path::Path {
        match self {
            Self::Launch { working_dir, .. }
            | Self::Failed { working_dir, .. }
            | Self::Rejected { working_dir, .. } => working_dir,
        }
    }
}
