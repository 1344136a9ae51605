mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use rtbuild_lib::platform::{Arch, Os};
use rtbuild_lib::{BuildConfig, ConfigOverrides};

use crate::output::{OutputFormat, Tone, say};

/// rtbuild - provision the bundled runtime and rebuild native dependencies against it
#[derive(Parser)]
#[command(name = "rtbuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short = 'o', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Ensure the runtime is installed and native dependencies are rebuilt against it
  Deps(ProjectArgs),

  /// Show what `deps` would do without changing anything
  Status(ProjectArgs),

  /// Show host platform details
  Info,
}

#[derive(Args)]
struct ProjectArgs {
  /// Project directory containing package.json
  #[arg(default_value = ".")]
  project: PathBuf,

  /// Runtime version to use instead of `_electron.version` from package.json
  #[arg(long)]
  electron_version: Option<String>,

  /// Directory the runtime is installed into (default: <project>/.electron)
  #[arg(long)]
  runtime_dir: Option<PathBuf>,

  /// Target operating system (linux, darwin, win32)
  #[arg(long)]
  platform: Option<Os>,

  /// Target architecture (x64, ia32, arm64, armv7l)
  #[arg(long)]
  arch: Option<Arch>,

  /// Base URL runtime releases are downloaded from (default: $ELECTRON_MIRROR or GitHub releases)
  #[arg(long)]
  mirror: Option<String>,

  /// Native rebuild tool (default: <project>/node_modules/.bin/electron-rebuild)
  #[arg(long)]
  rebuild_tool: Option<PathBuf>,
}

impl ProjectArgs {
  fn resolve(self) -> Result<BuildConfig> {
    let root = dunce::canonicalize(&self.project)
      .with_context(|| format!("Project directory not found: {}", self.project.display()))?;

    let overrides = ConfigOverrides {
      runtime_version: self.electron_version,
      runtime_dir: self.runtime_dir,
      os: self.platform,
      arch: self.arch,
      mirror: self.mirror,
      rebuild_tool: self.rebuild_tool,
    };

    let config = BuildConfig::from_project(&root, overrides).context("Invalid project configuration")?;
    debug!(
      project = %root.display(),
      runtime = %config.runtime_version(),
      platform = %config.download.platform,
      "resolved project configuration"
    );
    Ok(config)
  }
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    Commands::Deps(args) => args.resolve().and_then(|config| cmd::cmd_deps(&config, cli.output)),
    Commands::Status(args) => args
      .resolve()
      .and_then(|config| cmd::cmd_status(&config, cli.verbose, cli.output)),
    Commands::Info => cmd::cmd_info(cli.output),
  };

  if let Err(e) = result {
    say(Tone::Fail, &format!("{:#}", e));
    std::process::exit(1);
  }
}
