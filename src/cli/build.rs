use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Args;

use crate::{
    cli::{build_dirs, check_status, load_config},
    cmake,
    shell::Shell,
};

#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    /// Build this target instead of the default one
    #[arg(long, value_name = "TARGET")]
    pub(crate) target: Option<String>,

    /// Number of parallel jobs, defaults to the number of CPUs
    #[arg(short, long, env = "NDK_CMAKE_JOBS")]
    pub(crate) jobs: Option<usize>,

    /// Build directories; searched for from the current directory if omitted
    pub(crate) dirs: Vec<PathBuf>,
}

pub fn run(shell: &mut Shell, args: BuildArgs) -> anyhow::Result<()> {
    let dirs = build_dirs(shell, &args.dirs)?;
    let jobs = args.jobs.filter(|j| *j > 0).unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    });

    for dir in dirs {
        let config = load_config(shell, &dir)?;
        shell.status_with_color(
            "Building",
            format!("{} ({}, {})", dir.display(), config.abi, config.build_mode),
            termcolor::Color::Cyan,
        )?;

        let cmd = cmake::build_command(&config.cmake, &dir, args.target.as_deref(), jobs);
        let status = cmake::run(shell, cmd)?;
        check_status(shell, status)?;
    }

    Ok(())
}
