use super::*;
use std::path::{Path, PathBuf};

#[derive(Default)]
struct RecordingInvoker {
    calls: Vec<PathBuf>,
    fail_in: Option<PathBuf>,
}

impl ResolutionInvoker for RecordingInvoker {
    fn invoke(&mut self, step: &ResolutionStep) -> Result<(), ResolutionError> {
        self.calls.push(step.working_dir().to_path_buf());
        if self.fail_in.as_deref() == Some(step.working_dir()) {
            return Err(ResolutionError::Rejected {
                working_dir: step.working_dir().to_path_buf(),
                reason: "unable to resolve NuGet.Versioning".to_string(),
            });
        }
        Ok(())
    }
}

fn args_as_strings(step: &ResolutionStep) -> Vec<String> {
    step.args()
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn standard_plan_uses_fixed_flag_sets() {
    let plan = ResolutionPlan::standard(
        "/repo/src",
        "/repo/artifacts/corehost",
        Some(PathBuf::from("/repo/tools")),
    );

    assert_eq!(plan.steps().len(), 2);
    assert_eq!(plan.steps()[0].working_dir(), Path::new("/repo/src"));
    assert_eq!(
        args_as_strings(&plan.steps()[0]),
        vec![
            "--verbosity",
            "verbose",
            "--disable-parallel",
            "--fallbacksource",
            "/repo/artifacts/corehost"
        ]
    );
    assert_eq!(plan.steps()[1].working_dir(), Path::new("/repo/tools"));
    assert_eq!(
        args_as_strings(&plan.steps()[1]),
        vec!["--verbosity", "verbose", "--infer-runtimes"]
    );
}

#[test]
fn standard_plan_without_secondary_dir_keeps_full_primary_flag_set() {
    let plan = ResolutionPlan::standard("/repo/src", "/repo/corehost", None);
    assert_eq!(plan.steps().len(), 1);
    assert_eq!(
        plan.steps()[0].flags(),
        &[
            ResolveFlag::Verbosity(Verbosity::Verbose),
            ResolveFlag::DisableParallel,
            ResolveFlag::FallbackSource(PathBuf::from("/repo/corehost")),
        ]
    );
}

#[test]
fn run_plan_invokes_steps_in_order() {
    let plan = ResolutionPlan::standard(
        "/repo/src",
        "/repo/corehost",
        Some(PathBuf::from("/repo/tools")),
    );
    let mut invoker = RecordingInvoker::default();

    run_plan(&plan, &mut invoker).expect("plan must succeed");

    assert_eq!(
        invoker.calls,
        vec![PathBuf::from("/repo/src"), PathBuf::from("/repo/tools")]
    );
}

#[test]
fn run_plan_stops_at_first_failure() {
    let plan = ResolutionPlan::standard(
        "/repo/src",
        "/repo/corehost",
        Some(PathBuf::from("/repo/tools")),
    );
    let mut invoker = RecordingInvoker {
        fail_in: Some(PathBuf::from("/repo/src")),
        ..RecordingInvoker::default()
    };

    let err = run_plan(&plan, &mut invoker).expect_err("plan must fail");

    assert_eq!(err.working_dir(), Path::new("/repo/src"));
    assert_eq!(invoker.calls, vec![PathBuf::from("/repo/src")]);
}

#[test]
fn empty_plan_is_a_no_op() {
    let mut invoker = RecordingInvoker::default();
    run_plan(&ResolutionPlan::default(), &mut invoker).expect("empty plan must succeed");
    assert!(invoker.calls.is_empty());
}

#[test]
fn command_invoker_passes_base_args_before_flags() {
    let invoker = CommandInvoker::new("dotnet").with_args(["restore"]);
    let step = ResolutionStep::new("/repo/tools", vec![ResolveFlag::InferRuntimes]);
    let command = invoker.build_command(&step);

    assert_eq!(command.get_program(), "dotnet");
    let args = command
        .get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(args, vec!["restore", "--infer-runtimes"]);
    assert_eq!(command.get_current_dir(), Some(Path::new("/repo/tools")));
}

#[test]
fn command_invoker_exports_package_cache() {
    let invoker = CommandInvoker::new("dotnet")
        .with_package_cache(Some(PackageCache::new("/tmp/isolated-packages")));
    let step = ResolutionStep::new("/repo/src", Vec::new());
    let command = invoker.build_command(&step);

    let exported = command
        .get_envs()
        .find(|(key, _)| *key == DEFAULT_PACKAGE_CACHE_ENV)
        .and_then(|(_, value)| value)
        .map(|value| value.to_string_lossy().into_owned());
    assert_eq!(exported.as_deref(), Some("/tmp/isolated-packages"));
}

#[test]
fn command_invoker_reports_launch_failure() {
    let dir = tempfile::tempdir().expect("must create temp dir");
    let mut invoker = CommandInvoker::new("pinswap-definitely-missing-resolver");
    let step = ResolutionStep::new(dir.path(), Vec::new());

    let err = invoker.invoke(&step).expect_err("missing program must fail");
    assert!(matches!(err, ResolutionError::Launch { .. }));
}

#[cfg(unix)]
#[test]
fn command_invoker_runs_in_working_dir_with_flags_and_cache() {
    let dir = tempfile::tempdir().expect("must create temp dir");
    let cache = dir.path().join("packages");
    let mut invoker = CommandInvoker::new("sh")
        .with_args([
            "-c",
            "printf '%s\\n' \"$@\" > args.txt; printf '%s' \"$NUGET_PACKAGES\" > cache.txt",
            "resolver",
        ])
        .with_package_cache(Some(PackageCache::new(&cache)));
    let step = ResolutionStep::new(
        dir.path(),
        vec![
            ResolveFlag::Verbosity(Verbosity::Verbose),
            ResolveFlag::DisableParallel,
        ],
    );

    invoker.invoke(&step).expect("resolver must succeed");

    let args = std::fs::read_to_string(dir.path().join("args.txt")).expect("must read args");
    assert_eq!(args, "--verbosity\nverbose\n--disable-parallel\n");
    let exported = std::fs::read_to_string(dir.path().join("cache.txt")).expect("must read cache");
    assert_eq!(exported, cache.display().to_string());
}

#[cfg(unix)]
#[test]
fn command_invoker_surfaces_nonzero_exit_with_stderr() {
    let dir = tempfile::tempdir().expect("must create temp dir");
    let mut invoker = CommandInvoker::new("sh").with_args([
        "-c",
        "echo 'Unable to resolve NuGet.Versioning (>= 9.9.9)' >&2; exit 3",
    ]);
    let step = ResolutionStep::new(dir.path(), Vec::new());

    let err = invoker.invoke(&step).expect_err("non-zero exit must fail");
    match err {
        ResolutionError::Failed { status, stderr, .. } => {
            assert_eq!(status.code(), Some(3));
            assert_eq!(stderr, "Unable to resolve NuGet.Versioning (>= 9.9.9)");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
