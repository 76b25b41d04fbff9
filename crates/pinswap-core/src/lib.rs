mod digest;
mod error;
mod manifest;
mod patch;
mod version_override;

pub use digest::sha256_hex;
pub use error::ManifestError;
pub use manifest::{DependencyEntry, ManifestDocument, VersionSpec, DEPENDENCIES_KEY, VERSION_KEY};
pub use patch::{patch_manifest_bytes, PatchedBytes};
pub use version_override::{VersionOverride, DEFAULT_NAME_PREFIX};
