use crate::error::ManifestError;
use crate::manifest::ManifestDocument;
use crate::version_override::VersionOverride;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedBytes {
    pub bytes: Vec<u8>,
    /// Dependency names that received the override, in document order.
    pub rewritten: Vec<String>,
}

/// Decodes, rewrites and re-encodes one manifest.
///
/// Fails with [`ManifestError::Schema`] when the manifest has no
/// `dependencies` object or a matching entry has an unsupported shape.
pub fn patch_manifest_bytes(
    original: &[u8],
    version_override: &VersionOverride,
) -> Result<PatchedBytes, ManifestError> {
    let mut document = ManifestDocument::from_slice(original)?;
    let rewritten = document.apply_override(version_override)?;
    let bytes = document.to_vec_pretty()?;
    Ok(PatchedBytes { bytes, rewritten })
}
