mod capture;
mod cycle;
mod error;
mod layout;
mod restore;

pub use capture::{capture_manifest, CapturedManifest};
pub use cycle::{CycleState, PinCycle};
pub use error::{CycleError, ErrorKind};
pub use layout::{ManifestLocator, DEFAULT_MANIFEST_FILE};
pub use restore::{restore_manifest, restore_manifests};
