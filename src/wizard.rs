//! The `init` question sequence.

use std::io::{BufRead, Write};
use std::path::{Component, Path, PathBuf};

use anyhow::{Context as _, bail};

use crate::config::BuildConfig;
use crate::meta::Defaults;
use crate::options::{
    Abi, ArmMode, BuildMode, Choice, DEFAULT_PLATFORM, Stl, android_version_name,
};
use crate::prompt::Prompter;

/// Discovered (or entered) locations of the host tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub sdk: PathBuf,
    pub cmake: PathBuf,
    pub ndk: PathBuf,
}

/// Result of the question sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    pub config: BuildConfig,
    pub build_dir_name: String,
}

/// Uses `cwd` when it holds a `CMakeLists.txt`, otherwise asks for the
/// project directory.
pub fn locate_project<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    cwd: &Path,
) -> anyhow::Result<PathBuf> {
    let project = if cwd.join("CMakeLists.txt").is_file() {
        cwd.to_path_buf()
    } else {
        let default = cwd.display().to_string();
        let answer = prompter.ask_string("Project path", Some(default.as_str()))?;
        cwd.join(answer)
    };

    let lists = project.join("CMakeLists.txt");
    if !lists.is_file() {
        bail!("{} does not exist", lists.display());
    }
    dunce::canonicalize(&project)
        .with_context(|| format!("failed to resolve {}", project.display()))
}

/// Asks the target questions in order and assembles the configuration.
///
/// `platforms` is the list of API levels the NDK supports; when empty any
/// positive level is accepted.
pub fn ask<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    project: PathBuf,
    toolchain: Toolchain,
    platforms: &[u32],
    defaults: &Defaults,
) -> anyhow::Result<Answers> {
    let abi = prompter.choose(
        "ANDROID_ABI",
        defaults.abi.unwrap_or_else(Abi::default_choice),
    )?;

    let arm_mode = if abi.is_armv7() {
        prompter.choose(
            "ANDROID_ARM_MODE",
            defaults.arm_mode.unwrap_or_else(ArmMode::default_choice),
        )?
    } else {
        ArmMode::default_choice()
    };

    let neon = if abi.has_optional_neon() {
        prompter.choose_optional("ANDROID_ARM_NEON", defaults.neon)?
    } else {
        None
    };

    let ld = prompter.choose_optional("ANDROID_LD", defaults.ld)?;

    let platform = ask_platform(
        prompter,
        platforms,
        defaults.platform.unwrap_or(DEFAULT_PLATFORM),
    )?;

    let stl = prompter.choose(
        "ANDROID_STL",
        defaults.stl.unwrap_or_else(Stl::default_choice),
    )?;

    let build_mode = prompter.choose(
        "Build mode",
        defaults.build_mode.unwrap_or_else(BuildMode::default_choice),
    )?;

    let config = BuildConfig {
        project,
        sdk: toolchain.sdk,
        cmake: toolchain.cmake,
        ndk: toolchain.ndk,
        abi,
        arm_mode,
        neon,
        ld,
        platform,
        stl,
        build_mode,
        ninja: defaults.ninja.unwrap_or(false),
    };

    let default_name = config.default_build_dir_name();
    let build_dir_name =
        prompter.ask_string("CMake build directory", Some(default_name.as_str()))?;

    Ok(Answers {
        config,
        build_dir_name,
    })
}

fn ask_platform<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    platforms: &[u32],
    default: u32,
) -> anyhow::Result<u32> {
    let mut question = format!("ANDROID_PLATFORM (default: {default}):");
    for level in platforms {
        question.push_str(&format!(
            "\n\t{level}: {}",
            android_version_name(*level).unwrap_or("unknown")
        ));
    }

    let level = prompter.ask_number(&question)?.filter(|level| {
        if platforms.is_empty() {
            *level > 0
        } else {
            platforms.contains(level)
        }
    });
    Ok(level.unwrap_or(default))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Joins `name` onto `project`, refusing absolute names and names that
/// would make `init` wipe the project or one of its parents.
pub fn build_dir_path(project: &Path, name: &str) -> anyhow::Result<PathBuf> {
    let rooted = Path::new(name)
        .components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)));
    if rooted {
        bail!("build directory `{name}` must be relative to the project");
    }

    let dir = normalize(&project.join(name));
    if normalize(project).starts_with(&dir) {
        bail!(
            "refusing to use {} as a build directory: it contains the project",
            dir.display()
        );
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use super::*;
    use crate::options::{Linker, Neon};

    fn toolchain() -> Toolchain {
        Toolchain {
            sdk: PathBuf::from("/sdk"),
            cmake: PathBuf::from("/sdk/cmake/3.22.1/bin/cmake"),
            ndk: PathBuf::from("/sdk/ndk/25.2.9519653"),
        }
    }

    fn run(input: &str, platforms: &[u32], defaults: &Defaults) -> (Answers, String) {
        let mut p = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let answers = ask(&mut p, PathBuf::from("/p"), toolchain(), platforms, defaults).unwrap();
        (answers, String::from_utf8(p.into_output()).unwrap())
    }

    #[test]
    fn all_defaults() {
        let (answers, _) = run("", &[16, 21, 28], &Defaults::default());
        let cfg = &answers.config;
        assert_eq!(cfg.abi, Abi::ArmeabiV7a);
        assert_eq!(cfg.arm_mode, ArmMode::Thumb);
        assert_eq!(cfg.neon, None);
        assert_eq!(cfg.ld, None);
        assert_eq!(cfg.platform, 21);
        assert_eq!(cfg.stl, Stl::CxxStatic);
        assert_eq!(cfg.build_mode, BuildMode::Debug);
        assert_eq!(
            answers.build_dir_name,
            "cmake-armeabi-v7a-thumb-c++_static-android21-Debug"
        );
    }

    #[test]
    fn armv7_asks_every_question() {
        // abi, arm mode, neon, ld, platform, stl, build mode, dir
        let (answers, out) = run("0\n1\n1\n1\n28\n1\n1\nout\n", &[16, 21, 28], &Defaults::default());
        let cfg = &answers.config;
        assert_eq!(cfg.arm_mode, ArmMode::Arm);
        assert_eq!(cfg.neon, Some(Neon::True));
        assert_eq!(cfg.ld, Some(Linker::Lld));
        assert_eq!(cfg.platform, 28);
        assert_eq!(cfg.stl, Stl::CxxShared);
        assert_eq!(cfg.build_mode, BuildMode::Release);
        assert_eq!(answers.build_dir_name, "out");
        assert!(out.contains("\t28: Android 9.0 Pie"));
    }

    #[test]
    fn neon_abi_skips_neon_question() {
        // abi, arm mode, ld, platform, stl, build mode, dir
        let (answers, out) = run("1\n0\n2\n21\n3\n3\n\n", &[21], &Defaults::default());
        let cfg = &answers.config;
        assert_eq!(cfg.abi, Abi::ArmeabiV7aNeon);
        assert_eq!(cfg.neon, None);
        assert_eq!(cfg.ld, Some(Linker::Default));
        assert_eq!(cfg.stl, Stl::System);
        assert_eq!(cfg.build_mode, BuildMode::MinSizeRel);
        assert!(!out.contains("ANDROID_ARM_NEON"));
        assert_eq!(
            answers.build_dir_name,
            "cmake-armeabi-v7a-with-NEON-thumb-system-android21-MinSizeRel"
        );
    }

    #[test]
    fn non_arm_abi_skips_arm_questions() {
        // abi, ld, platform, stl, build mode, dir
        let (answers, out) = run("4\n\n24\n\n2\n\n", &[21, 24], &Defaults::default());
        let cfg = &answers.config;
        assert_eq!(cfg.abi, Abi::X86_64);
        assert_eq!(cfg.arm_mode, ArmMode::Thumb);
        assert_eq!(cfg.platform, 24);
        assert_eq!(cfg.build_mode, BuildMode::RelWithDebInfo);
        assert!(!out.contains("ANDROID_ARM_MODE"));
        assert_eq!(
            answers.build_dir_name,
            "cmake-x86_64-c++_static-android24-RelWithDebInfo"
        );
    }

    #[test]
    fn unknown_platform_uses_default() {
        let (answers, _) = run("2\n\n19\n", &[21, 24], &Defaults::default());
        assert_eq!(answers.config.platform, 21);
    }

    #[test]
    fn any_platform_without_list() {
        let (answers, _) = run("2\n\n33\n", &[], &Defaults::default());
        assert_eq!(answers.config.platform, 33);

        let (answers, _) = run("2\n\n0\n", &[], &Defaults::default());
        assert_eq!(answers.config.platform, 21);
    }

    #[test]
    fn project_defaults_apply() {
        let defaults = Defaults {
            abi: Some(Abi::Arm64V8a),
            platform: Some(24),
            build_mode: Some(BuildMode::Release),
            ..Defaults::default()
        };
        let (answers, _) = run("", &[21, 24], &defaults);
        assert_eq!(answers.config.abi, Abi::Arm64V8a);
        assert_eq!(answers.config.platform, 24);
        assert_eq!(answers.config.build_mode, BuildMode::Release);
        assert!(!answers.config.ninja);
    }

    #[test]
    fn project_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("CMakeLists.txt"), "").unwrap();
        let mut p = Prompter::new(Cursor::new(Vec::new()), Vec::new());
        let project = locate_project(&mut p, dir.path()).unwrap();
        assert_eq!(project, dunce::canonicalize(dir.path()).unwrap());
        assert!(p.into_output().is_empty());
    }

    #[test]
    fn project_asked_for() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("native")).unwrap();
        fs::write(dir.path().join("native/CMakeLists.txt"), "").unwrap();

        let mut p = Prompter::new(Cursor::new(b"native\n".to_vec()), Vec::new());
        let project = locate_project(&mut p, dir.path()).unwrap();
        assert_eq!(
            project,
            dunce::canonicalize(dir.path().join("native")).unwrap()
        );

        let mut p = Prompter::new(Cursor::new(b"\n".to_vec()), Vec::new());
        assert!(locate_project(&mut p, dir.path()).is_err());
    }

    #[test]
    fn build_dir_must_not_contain_project() {
        let project = Path::new("/work/project");
        assert_eq!(
            build_dir_path(project, "cmake-x86").unwrap(),
            PathBuf::from("/work/project/cmake-x86")
        );
        assert_eq!(
            build_dir_path(project, "../project-build").unwrap(),
            PathBuf::from("/work/project-build")
        );
        assert!(build_dir_path(project, "").is_err());
        assert!(build_dir_path(project, ".").is_err());
        assert!(build_dir_path(project, "..").is_err());
        assert!(build_dir_path(project, "/").is_err());
    }

    #[test]
    fn build_dir_must_be_relative() {
        let project = Path::new("/work/project");
        let err = build_dir_path(project, "/home/user/Documents").unwrap_err();
        assert!(err.to_string().contains("must be relative"));
        assert!(build_dir_path(project, "/work/project/out").is_err());
        assert!(build_dir_path(project, "out/../cmake-x86").is_ok());
    }
}
