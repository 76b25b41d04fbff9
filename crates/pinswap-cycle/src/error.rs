use std::path::PathBuf;

use pinswap_core::ManifestError;
use pinswap_resolve::ResolutionError;
use thiserror::Error;

use crate::CycleState;

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("failed to {action} manifest {}", .path.display())]
    FileAccess {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to apply version {version} to manifest {}", .path.display())]
    Manifest {
        path: PathBuf,
        version: String,
        #[source]
        source: ManifestError,
    },

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(
        "cannot patch in state {}: {patched} manifest(s) still hold the override",
        .state.as_str()
    )]
    StillPatched { state: CycleState, patched: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileAccess,
    Parse,
    Schema,
    Resolution,
    State,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FileAccess => "file-access",
            Self::Parse => "parse",
            Self::Schema => "schema",
            Self::Resolution => "resolution",
            Self::State => "state",
        }
    }
}

impl CycleError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            action: "read",
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            action: "write",
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileAccess { .. } => ErrorKind::FileAccess,
            Self::Manifest { source, .. } if source.is_parse() => ErrorKind::Parse,
            Self::Manifest { .. } => ErrorKind::Schema,
            Self::Resolution(_) => ErrorKind::Resolution,
            Self::StillPatched { .. } => ErrorKind::State,
        }
    }

    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::FileAccess { path, .. } | Self::Manifest { path, .. } => Some(path),
            Self::Resolution(err) => Some(err.working_dir()),
            Self::StillPatched { .. } => None,
        }
    }
}
