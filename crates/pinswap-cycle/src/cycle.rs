use std::fs;

use pinswap_core::{patch_manifest_bytes, VersionOverride};
use pinswap_resolve::{run_plan, ResolutionInvoker, ResolutionPlan};

use crate::restore::write_back_all;
use crate::{capture_manifest, CapturedManifest, CycleError, ManifestLocator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Captured,
    Patched,
    ResolvedPatched,
    RestoredBytes,
    ResolvedRestored,
}

impl CycleState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Captured => "captured",
            Self::Patched => "patched",
            Self::ResolvedPatched => "resolved-patched",
            Self::RestoredBytes => "restored-bytes",
            Self::ResolvedRestored => "resolved-restored",
        }
    }
}

/// One patch/restore cycle around a build step.
///
/// A failure leaves the cycle in the state it had reached; nothing is rolled
/// back automatically. [`PinCycle::patched`] lists the manifests a caller has
/// to restore to undo a partial patch phase.
#[derive(Debug)]
pub struct PinCycle {
    locator: ManifestLocator,
    plan: ResolutionPlan,
    version_override: Option<VersionOverride>,
    state: CycleState,
    captured: Vec<CapturedManifest>,
    written: usize,
}

impl PinCycle {
    pub fn new(
        locator: ManifestLocator,
        plan: ResolutionPlan,
        version_override: Option<VersionOverride>,
    ) -> Self {
        Self {
            locator,
            plan,
            version_override,
            state: CycleState::Idle,
            captured: Vec::new(),
            written: 0,
        }
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn version_override(&self) -> Option<&VersionOverride> {
        self.version_override.as_ref()
    }

    /// Manifests whose write has been attempted during the patch phase.
    pub fn patched(&self) -> &[CapturedManifest] {
        &self.captured[..self.written]
    }

    pub fn into_patched(mut self) -> Vec<CapturedManifest> {
        self.captured.truncate(self.written);
        self.captured
    }

    /// Captures every located manifest, rewrites each one in order, then runs
    /// resolution. Without an override nothing happens.
    ///
    /// Fails with [`CycleError::StillPatched`] while a previous patch has not
    /// been restored, so the captured originals are never replaced by
    /// patched bytes.
    pub fn patch<I>(&mut self, invoker: &mut I) -> Result<(), CycleError>
    where
        I: ResolutionInvoker + ?Sized,
    {
        let Some(version_override) = self.version_override.clone() else {
            tracing::debug!("no override version configured, skipping patch phase");
            return Ok(());
        };

        if self.holds_override() {
            return Err(CycleError::StillPatched {
                state: self.state,
                patched: self.written,
            });
        }

        self.captured.clear();
        self.written = 0;
        self.state = CycleState::Idle;
        for path in self.locator.locate() {
            self.captured.push(capture_manifest(&path)?);
        }
        self.state = CycleState::Captured;

        for index in 0..self.captured.len() {
            let captured = &self.captured[index];
            let path = captured.path().to_path_buf();
            tracing::warn!(
                path = %path.display(),
                version = version_override.version(),
                "setting the dependency version in {} to {}",
                path.display(),
                version_override.version()
            );

            let patched = patch_manifest_bytes(captured.original_bytes(), &version_override)
                .map_err(|source| CycleError::Manifest {
                    path: path.clone(),
                    version: version_override.version().to_string(),
                    source,
                })?;
            tracing::debug!(
                path = %path.display(),
                rewritten = ?patched.rewritten,
                "rewrote dependency entries"
            );

            self.written = index + 1;
            fs::write(&path, &patched.bytes).map_err(|err| CycleError::write(&path, err))?;
        }
        self.state = CycleState::Patched;

        run_plan(&self.plan, invoker)?;
        self.state = CycleState::ResolvedPatched;
        Ok(())
    }

    /// True while some manifest on disk may carry override content, i.e. a
    /// write was attempted and the originals have not been written back since.
    fn holds_override(&self) -> bool {
        self.written > 0
            && !matches!(
                self.state,
                CycleState::RestoredBytes | CycleState::ResolvedRestored
            )
    }

    /// Writes back the original bytes of every patched manifest and re-runs
    /// resolution. Safe to call more than once.
    pub fn restore<I>(&mut self, invoker: &mut I) -> Result<(), CycleError>
    where
        I: ResolutionInvoker + ?Sized,
    {
        let Some(version_override) = &self.version_override else {
            return Ok(());
        };
        if self.written == 0 {
            return Ok(());
        }

        write_back_all(&self.captured[..self.written], version_override.version())?;
        self.state = CycleState::RestoredBytes;

        run_plan(&self.plan, invoker)?;
        self.state = CycleState::ResolvedRestored;
        Ok(())
    }
}
