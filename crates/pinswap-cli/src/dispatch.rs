use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use pinswap_core::{DependencyEntry, ManifestDocument, VersionOverride};
use pinswap_cycle::{capture_manifest, CapturedManifest, PinCycle};

use crate::completion::write_completions_script;
use crate::config::{load_config, PinConfig};
use crate::render::{current_output_style, ProgressInvoker, TerminalRenderer};
use crate::{Cli, Commands};

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    let renderer = TerminalRenderer::from_style(current_output_style(cli.plain));

    match cli.command {
        Commands::Run {
            override_version,
            rollback_on_failure,
            command,
        } => {
            let config = load_config(&cli.config)?;
            run_pinned_build(
                &config,
                override_version,
                rollback_on_failure,
                &command,
                renderer,
            )?;
        }
        Commands::Preview { override_version } => {
            let config = load_config(&cli.config)?;
            let Some(version_override) = config.version_override(override_version) else {
                renderer.print_status("warn", "no override version configured; nothing would change");
                return Ok(());
            };
            for path in config.locator().locate() {
                let captured = capture_manifest(&path)?;
                let document = ManifestDocument::from_slice(captured.original_bytes())
                    .with_context(|| format!("failed to parse manifest: {}", path.display()))?;
                let entries = document
                    .dependencies()
                    .with_context(|| format!("invalid manifest: {}", path.display()))?;
                renderer.print_lines(&format_preview_lines(&path, &entries, &version_override));
            }
        }
        Commands::Completions { shell } => {
            write_completions_script(shell, &mut io::stdout().lock())?;
        }
    }

    Ok(())
}

fn run_pinned_build(
    config: &PinConfig,
    override_version: Option<String>,
    rollback_on_failure: bool,
    build_command: &[String],
    renderer: TerminalRenderer,
) -> Result<()> {
    let version_override = config.version_override(override_version);
    let mut invoker = ProgressInvoker::new(config.command_invoker(), renderer);
    let mut cycle = PinCycle::new(config.locator(), config.plan(), version_override);

    if let Err(err) = cycle.patch(&mut invoker) {
        renderer.print_status(
            "err",
            &format!(
                "patch phase failed ({}) in state {}",
                err.kind().as_str(),
                cycle.state().as_str()
            ),
        );
        renderer.print_lines(&format_patched_lines(cycle.patched()));
        if rollback_on_failure && !cycle.patched().is_empty() {
            cycle
                .restore(&mut invoker)
                .context("rollback after failed patch phase failed")?;
            renderer.print_status("ok", "rolled back patched manifests");
        }
        return Err(anyhow::Error::new(err).context("patch phase failed"));
    }

    if let Some(version_override) = cycle.version_override() {
        renderer.print_status(
            "ok",
            &format!(
                "pinned {}* to {} in {} manifest(s)",
                version_override.name_prefix(),
                version_override.version(),
                cycle.patched().len()
            ),
        );
    }

    let build = run_build_step(build_command, &config.repo_root);

    cycle.restore(&mut invoker).context("restore phase failed")?;
    if !cycle.patched().is_empty() {
        renderer.print_status("ok", "restored original manifests");
    }

    let status = build?;
    if !status.success() {
        anyhow::bail!("build command failed: {status}");
    }
    Ok(())
}

fn run_build_step(build_command: &[String], working_dir: &Path) -> Result<ExitStatus> {
    let (program, args) = build_command
        .split_first()
        .context("build command must not be empty")?;
    Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .status()
        .with_context(|| format!("failed to launch build command '{program}'"))
}

pub(crate) fn format_preview_lines(
    path: &Path,
    entries: &[DependencyEntry],
    version_override: &VersionOverride,
) -> Vec<String> {
    let mut lines = vec![format!("{}:", path.display())];
    let matching = entries
        .iter()
        .filter(|entry| version_override.matches(&entry.name))
        .collect::<Vec<_>>();
    if matching.is_empty() {
        lines.push("  (no matching dependencies)".to_string());
        return lines;
    }
    for entry in matching {
        lines.push(format!(
            "  {} {} -> {} ({})",
            entry.name,
            entry.spec.version().unwrap_or("<none>"),
            version_override.version(),
            entry.spec.kind()
        ));
    }
    lines
}

pub(crate) fn format_patched_lines(patched: &[CapturedManifest]) -> Vec<String> {
    if patched.is_empty() {
        return vec!["no manifests were modified".to_string()];
    }
    let mut lines = vec!["modified manifests (original sha256):".to_string()];
    for manifest in patched {
        lines.push(format!(
            "  {} {}",
            manifest.path().display(),
            manifest.digest()
        ));
    }
    lines
}
