use std::fs;

use pinswap_resolve::{run_plan, ResolutionInvoker, ResolutionPlan};

use crate::{CapturedManifest, CycleError};

/// Writes the captured bytes back verbatim, without comparing first.
pub fn restore_manifest(captured: &CapturedManifest) -> Result<(), CycleError> {
    fs::write(captured.path(), captured.original_bytes())
        .map_err(|err| CycleError::write(captured.path(), err))
}

/// Restores every manifest, then re-runs resolution. An empty list is a no-op.
///
/// `override_version` is the version being rolled back; it only appears in
/// the warning emitted before each write.
pub fn restore_manifests<I>(
    captured: &[CapturedManifest],
    override_version: &str,
    plan: &ResolutionPlan,
    invoker: &mut I,
) -> Result<(), CycleError>
where
    I: ResolutionInvoker + ?Sized,
{
    if captured.is_empty() {
        return Ok(());
    }

    write_back_all(captured, override_version)?;
    run_plan(plan, invoker)?;
    Ok(())
}

pub(crate) fn write_back_all(
    captured: &[CapturedManifest],
    override_version: &str,
) -> Result<(), CycleError> {
    for manifest in captured {
        tracing::warn!(
            path = %manifest.path().display(),
            version = override_version,
            "restoring the original dependency versions in {} (replacing {})",
            manifest.path().display(),
            override_version
        );
        restore_manifest(manifest)?;
    }
    Ok(())
}
