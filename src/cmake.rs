use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus};

use anyhow::Context as _;

use crate::config::BuildConfig;
use crate::sdk::BIN_EXT;
use crate::shell::Shell;

/// The CMake generator used when configuring a build directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Generator {
    #[default]
    Makefiles,
    /// The Ninja shipped next to the SDK's CMake, as Android Gradle uses it.
    Ninja,
}

fn define(key: &str, value: impl AsRef<std::ffi::OsStr>) -> OsString {
    let mut arg = OsString::from(format!("-D{key}="));
    arg.push(value);
    arg
}

/// Arguments for configuring `cfg.project` with the NDK toolchain file.
pub fn configure_args(cfg: &BuildConfig) -> Vec<OsString> {
    let mut args = vec![
        define("CMAKE_BUILD_TYPE", cfg.build_mode.as_str()),
        define("CMAKE_VERBOSE_MAKEFILE", "ON"),
        define("CMAKE_TOOLCHAIN_FILE", cfg.toolchain_file()),
        define("ANDROID_ABI", cfg.abi.as_str()),
        define("ANDROID_ARM_MODE", cfg.arm_mode.as_str()),
        define("ANDROID_PLATFORM", cfg.platform.to_string()),
        define("ANDROID_STL", cfg.stl.as_str()),
    ];

    if let Some(neon) = cfg.neon {
        args.push(define("ANDROID_ARM_NEON", neon.as_str()));
    }

    if let Some(ld) = cfg.ld {
        args.push(define("ANDROID_LD", ld.as_str()));
    }

    match cfg.generator() {
        Generator::Makefiles => {
            args.push("-G".into());
            args.push("CodeBlocks - Unix Makefiles".into());
        }
        Generator::Ninja => {
            let ninja = cfg
                .cmake
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(format!("ninja{BIN_EXT}"));
            args.push(define("ANDROID_TOOLCHAIN", "clang"));
            args.push(define("CMAKE_MAKE_PROGRAM", ninja));
            args.push("-G".into());
            args.push("Android Gradle - Ninja".into());
        }
    }

    args.push(cfg.project.clone().into_os_string());
    args
}

/// `cmake <configure args>` running inside `build_dir`.
pub fn configure_command(cfg: &BuildConfig, build_dir: &Path) -> Command {
    let mut cmd = Command::new(&cfg.cmake);
    cmd.current_dir(build_dir).args(configure_args(cfg));
    cmd
}

/// `cmake --build <dir> [--target <target>] -- -j <jobs>`
pub fn build_command(
    cmake: &Path,
    build_dir: &Path,
    target: Option<&str>,
    jobs: usize,
) -> Command {
    let mut cmd = Command::new(cmake);
    cmd.arg("--build").arg(build_dir);
    if let Some(target) = target {
        cmd.arg("--target").arg(target);
    }
    cmd.arg("--").arg("-j").arg(jobs.to_string());
    cmd
}

/// Renders a command the way a user would type it.
pub fn display_command(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|arg| {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                format!("{arg:?}")
            } else {
                arg.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Echoes and runs `cmd` with inherited stdio.
pub fn run(shell: &mut Shell, mut cmd: Command) -> anyhow::Result<ExitStatus> {
    shell.status("Running", format!("`{}`", display_command(&cmd)))?;
    if let Some(dir) = cmd.get_current_dir() {
        let dir = dir.display().to_string();
        shell.verbose(|shell| shell.note(format!("working directory: {dir}")))?;
    }

    cmd.status()
        .with_context(|| format!("failed to run {}", cmd.get_program().to_string_lossy()))
}
