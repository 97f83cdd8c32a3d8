use std::path::PathBuf;
use std::process::ExitStatus;

use clap::{Parser, Subcommand};

use crate::{
    config::BuildConfig,
    scan::select_build_dirs,
    shell::{Shell, Verbosity},
};

pub mod build;
pub mod init;
pub mod reload;

#[derive(Debug, Parser)]
#[command(
    name = "ndk-cmake",
    version,
    about = "Configure and build CMake projects for Android with the NDK toolchain file"
)]
struct Args {
    /// Use verbose output (-vv very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print nothing but errors and the build tool's own output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, value_name = "WHEN", global = true, env = "NDK_CMAKE_COLOR")]
    color: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask for target settings, create a build directory and configure it
    Init(init::InitArgs),
    /// Configure existing build directories again from their saved settings
    Reload(reload::ReloadArgs),
    /// Build existing build directories
    Build(build::BuildArgs),
}

impl Args {
    fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let args = match Args::try_parse_from(&args) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    let mut shell = Shell::new();
    shell.set_verbosity(args.verbosity());
    if let Err(e) = shell.set_color_choice(args.color.as_deref()) {
        shell.error(e)?;
        std::process::exit(2);
    }

    let result = match args.command {
        Command::Init(args) => init::run(&mut shell, args),
        Command::Reload(args) => reload::run(&mut shell, args),
        Command::Build(args) => build::run(&mut shell, args),
    };

    if let Err(e) = result {
        shell.error(format!("{e:#}"))?;
        std::process::exit(1);
    }

    Ok(())
}

/// Finds the build directories to act on and announces them.
pub(crate) fn build_dirs(shell: &mut Shell, requested: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let cwd = std::env::current_dir()?;
    let dirs = select_build_dirs(&cwd, requested)?;
    shell.status(
        "Found",
        format!(
            "build directories: {}",
            dirs.iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    )?;
    Ok(dirs)
}

pub(crate) fn load_config(shell: &mut Shell, dir: &std::path::Path) -> anyhow::Result<BuildConfig> {
    let path = BuildConfig::marker_path(dir);
    let config = BuildConfig::read_from(&path)?;
    shell.very_verbose(|shell| shell.note(format!("{}:\n{config}", path.display())))?;
    Ok(config)
}

/// Exits with the child's status when CMake failed.
pub(crate) fn check_status(shell: &mut Shell, status: ExitStatus) -> anyhow::Result<()> {
    if status.success() {
        return Ok(());
    }

    shell.error(format!("cmake exited with {status}"))?;
    std::process::exit(status.code().unwrap_or(1));
}
