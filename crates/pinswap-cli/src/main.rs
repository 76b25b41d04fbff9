use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

mod completion;
mod config;
mod dispatch;
mod logging;
mod render;

use dispatch::run_cli;

#[derive(Parser, Debug)]
#[command(name = "pinswap")]
#[command(
    about = "Temporarily pin dependency versions in project manifests around a build",
    long_about = None
)]
struct Cli {
    /// Path to the pinswap configuration file.
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,
    /// Disable colours, badges and spinners.
    #[arg(long, global = true)]
    plain: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Patch manifests, run a build command, then restore the manifests.
    Run {
        #[arg(long)]
        override_version: Option<String>,
        /// Restore already patched manifests when the patch phase fails.
        #[arg(long)]
        rollback_on_failure: bool,
        #[arg(trailing_var_arg = true, required = true, num_args = 1..)]
        command: Vec<String>,
    },
    /// Show which dependency entries an override would rewrite.
    Preview {
        #[arg(long)]
        override_version: Option<String>,
    },
    /// Print a shell completion script.
    Completions { shell: Shell },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);
    run_cli(cli)
}
