use std::path::PathBuf;

use clap::Args;

use crate::{
    cli::{build_dirs, check_status, load_config},
    cmake,
    shell::Shell,
};

#[derive(Debug, Args, Clone)]
pub struct ReloadArgs {
    /// Build directories; searched for from the current directory if omitted
    pub(crate) dirs: Vec<PathBuf>,
}

pub fn run(shell: &mut Shell, args: ReloadArgs) -> anyhow::Result<()> {
    for dir in build_dirs(shell, &args.dirs)? {
        let config = load_config(shell, &dir)?;
        shell.status_with_color(
            "Configuring",
            format!("{} ({}, android-{})", dir.display(), config.abi, config.platform),
            termcolor::Color::Cyan,
        )?;

        let status = cmake::run(shell, cmake::configure_command(&config, &dir))?;
        check_status(shell, status)?;
    }

    Ok(())
}
