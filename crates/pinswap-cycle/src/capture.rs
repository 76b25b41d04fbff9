use std::fs;
use std::path::{Path, PathBuf};

use pinswap_core::sha256_hex;

use crate::CycleError;

/// Original bytes of one manifest, recorded before it is modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedManifest {
    path: PathBuf,
    original_bytes: Vec<u8>,
}

impl CapturedManifest {
    pub fn new(path: impl Into<PathBuf>, original_bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            original_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_bytes(&self) -> &[u8] {
        &self.original_bytes
    }

    pub fn digest(&self) -> String {
        sha256_hex(&self.original_bytes)
    }
}

pub fn capture_manifest(path: &Path) -> Result<CapturedManifest, CycleError> {
    let original_bytes = fs::read(path).map_err(|err| CycleError::read(path, err))?;
    tracing::debug!(
        path = %path.display(),
        bytes = original_bytes.len(),
        "captured manifest"
    );
    Ok(CapturedManifest::new(path, original_bytes))
}
