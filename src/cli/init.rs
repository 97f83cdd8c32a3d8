use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Args;

use crate::{
    cli::check_status,
    cmake,
    config::BuildConfig,
    meta,
    prompt::Prompter,
    sdk::{self, Detection},
    shell::{Shell, Verbosity},
    wizard::{self, Toolchain},
};

#[derive(Debug, Args, Clone)]
pub struct InitArgs {
    /// Android SDK directory (default: $ANDROID_HOME, $ANDROID_SDK_ROOT or
    /// the Android Studio location)
    #[arg(long, value_name = "DIR")]
    pub(crate) sdk: Option<PathBuf>,

    /// Android NDK directory (default: newest NDK inside the SDK)
    #[arg(long, value_name = "DIR")]
    pub(crate) ndk: Option<PathBuf>,

    /// CMake executable (default: newest CMake inside the SDK, then PATH)
    #[arg(long, value_name = "PATH")]
    pub(crate) cmake: Option<PathBuf>,

    /// Generate Ninja build files with the SDK's ninja
    #[arg(long)]
    pub(crate) ninja: bool,

    /// Accept the default answer to every question
    #[arg(short, long)]
    pub(crate) yes: bool,
}

fn resolve<R: BufRead, W: Write>(
    shell: &mut Shell,
    prompter: &mut Prompter<R, W>,
    what: &str,
    given: Option<PathBuf>,
    derive: impl FnOnce() -> Option<(PathBuf, Detection)>,
) -> anyhow::Result<PathBuf> {
    let (path, method) = match given.map(|p| (p, Detection::CommandLine)).or_else(derive) {
        Some(found) => found,
        None => {
            shell.warn(format!("could not find the {what}"))?;
            let answer = prompter.ask_string(&format!("{what} path"), None)?;
            (PathBuf::from(answer), Detection::Prompt)
        }
    };

    shell.status("Found", format!("{what} at {}", path.display()))?;
    shell.verbose(|shell| shell.note(format!("{what} detected via {method}")))?;
    Ok(path)
}

fn recreate_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("failed to remove {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
}

fn print_config(shell: &mut Shell, config: &BuildConfig) -> anyhow::Result<()> {
    if shell.verbosity() == Verbosity::Quiet {
        return Ok(());
    }
    let rule = "--------------------------------";
    writeln!(shell.out(), "{rule}\n{config}\n{rule}")?;
    Ok(())
}

pub fn run(shell: &mut Shell, args: InitArgs) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("current directory could not be resolved")?;
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout()).assume_defaults(args.yes);

    let var = |name: &str| std::env::var_os(name);
    let sdk = resolve(shell, &mut prompter, "Android SDK", args.sdk, || {
        sdk::derive_sdk_path(var, sdk::android_studio_sdk_dir())
    })?;
    let cmake = resolve(shell, &mut prompter, "CMake", args.cmake, || {
        sdk::derive_cmake_path(Some(&sdk), var)
    })?;
    let ndk = resolve(shell, &mut prompter, "Android NDK", args.ndk, || {
        sdk::derive_ndk_path(Some(&sdk), var)
    })?;

    let project = wizard::locate_project(&mut prompter, &cwd)?;
    shell.status("Found", format!("project at {}", project.display()))?;

    let defaults = meta::load_defaults(&project)?;
    if defaults != meta::Defaults::default() {
        shell.verbose(|shell| {
            shell.note(format!("using defaults from {}", meta::PROJECT_FILE))
        })?;
    }

    let platforms = match sdk::find_platform_versions(&ndk) {
        Ok(levels) => levels,
        Err(e) => {
            shell.warn(format!("{e:#}"))?;
            shell.note("any API level will be accepted")?;
            Vec::new()
        }
    };

    let toolchain = Toolchain { sdk, cmake, ndk };
    let mut answers = wizard::ask(&mut prompter, project, toolchain, &platforms, &defaults)?;
    answers.config.ninja |= args.ninja;
    let config = answers.config;

    print_config(shell, &config)?;

    let build_dir = wizard::build_dir_path(&config.project, &answers.build_dir_name)?;
    recreate_dir(&build_dir)?;

    let marker = BuildConfig::marker_path(&build_dir);
    shell.status("Writing", marker.display())?;
    config.write_to(&marker)?;

    shell.status("Configuring", build_dir.display())?;
    let status = cmake::run(shell, cmake::configure_command(&config, &build_dir))?;
    check_status(shell, status)
}
