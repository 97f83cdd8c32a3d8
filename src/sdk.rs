//! Locating the Android SDK, NDK and CMake on the host.

use std::ffi::{OsStr, OsString};
use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use semver::{BuildMetadata, Prerelease, Version};
use serde::Deserialize;

#[cfg(target_os = "windows")]
pub(crate) const BIN_EXT: &str = ".exe";
#[cfg(not(target_os = "windows"))]
pub(crate) const BIN_EXT: &str = "";

/// How a toolchain component was found, reported in verbose output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    CommandLine,
    Prompt,
    EnvVar(&'static str),
    SdkComponent,
    AndroidStudio,
    SearchPath,
}

impl Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Detection::CommandLine => f.write_str("command line"),
            Detection::Prompt => f.write_str("prompt"),
            Detection::EnvVar(name) => write!(f, "${name}"),
            Detection::SdkComponent => f.write_str("SDK component"),
            Detection::AndroidStudio => f.write_str("Android Studio default"),
            Detection::SearchPath => f.write_str("PATH"),
        }
    }
}

/// Parses an SDK component directory name as a version.
///
/// SDK packages are not strictly semver: CMake ships as `3.10.2.4988404` and
/// older packages as `3.6`. Components past the third become build metadata.
pub fn parse_dir_version(name: &str) -> Option<Version> {
    if let Ok(version) = Version::parse(name) {
        return Some(version);
    }

    let mut parts = name.splitn(4, '.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    let build = match parts.next() {
        Some(rest) => BuildMetadata::new(rest).ok()?,
        None => BuildMetadata::EMPTY,
    };

    Some(Version {
        major,
        minor,
        patch,
        pre: Prerelease::EMPTY,
        build,
    })
}

/// Returns the subdirectory of `dir` with the highest version name.
pub fn find_max_version_dir(dir: &Path) -> anyhow::Result<PathBuf> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    entries
        .flat_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| {
            let path = entry.path();
            path.file_name()
                .and_then(OsStr::to_str)
                .and_then(parse_dir_version)
                .map(|version| (version, path))
        })
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, path)| path)
        .with_context(|| format!("no version directory found in {}", dir.display()))
}

/// Android Studio's default SDK location for the current user.
pub fn android_studio_sdk_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    let dir = pathos::user::local_dir().ok()?.join("Android").join("Sdk");
    #[cfg(any(target_os = "linux", target_os = "android"))]
    let dir = pathos::xdg::home_dir().ok()?.join("Android").join("Sdk");
    #[cfg(target_os = "macos")]
    let dir = pathos::user::home_dir()
        .ok()?
        .join("Library")
        .join("Android")
        .join("sdk");

    Some(dir)
}

fn path_var(var: &impl Fn(&str) -> Option<OsString>, name: &str) -> Option<PathBuf> {
    var(name).filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn search_path(var: &impl Fn(&str) -> Option<OsString>, binary: &str) -> Option<PathBuf> {
    which::which_in(binary, var("PATH"), Path::new(".")).ok()
}

/// Finds the SDK from the environment, then at `studio_dir` if it exists.
pub fn derive_sdk_path(
    var: impl Fn(&str) -> Option<OsString>,
    studio_dir: Option<PathBuf>,
) -> Option<(PathBuf, Detection)> {
    for name in ["ANDROID_HOME", "ANDROID_SDK_ROOT"] {
        if let Some(path) = path_var(&var, name) {
            return Some((path, Detection::EnvVar(name)));
        }
    }

    studio_dir
        .filter(|dir| dir.is_dir())
        .map(|dir| (dir, Detection::AndroidStudio))
}

/// Finds the newest CMake bundled with the SDK, else `cmake` on `PATH`.
pub fn derive_cmake_path(
    sdk: Option<&Path>,
    var: impl Fn(&str) -> Option<OsString>,
) -> Option<(PathBuf, Detection)> {
    if let Some(sdk) = sdk {
        if let Ok(dir) = find_max_version_dir(&sdk.join("cmake")) {
            let cmake = dir.join("bin").join(format!("cmake{BIN_EXT}"));
            if cmake.is_file() {
                return Some((cmake, Detection::SdkComponent));
            }
        }
    }

    search_path(&var, "cmake").map(|path| (path, Detection::SearchPath))
}

/// Finds the newest NDK inside the SDK, then falls back to the NDK
/// environment variables and finally to `ndk-build` on `PATH`.
pub fn derive_ndk_path(
    sdk: Option<&Path>,
    var: impl Fn(&str) -> Option<OsString>,
) -> Option<(PathBuf, Detection)> {
    if let Some(sdk) = sdk {
        if let Ok(dir) = find_max_version_dir(&sdk.join("ndk")) {
            return Some((dir, Detection::SdkComponent));
        }
        let bundle = sdk.join("ndk-bundle");
        if bundle.is_dir() {
            return Some((bundle, Detection::SdkComponent));
        }
    }

    // ANDROID_NDK_ROOT names an NDK; the others may hold side-by-side versions.
    for name in ["ANDROID_NDK_HOME", "ANDROID_NDK_ROOT", "NDK_HOME"] {
        if let Some(path) = path_var(&var, name) {
            let path = if name == "ANDROID_NDK_ROOT" {
                path
            } else {
                find_max_version_dir(&path).unwrap_or(path)
            };
            return Some((path, Detection::EnvVar(name)));
        }
    }

    search_path(&var, "ndk-build")
        .and_then(|path| path.parent().map(Path::to_path_buf))
        .map(|path| (path, Detection::SearchPath))
}

#[derive(Debug, Deserialize)]
struct PlatformsMeta {
    min: u32,
    max: u32,
}

/// Lists the API levels the NDK can target, ascending.
///
/// Older NDKs carry a `platforms/android-N` directory per level; r22 and
/// later describe the supported range in `meta/platforms.json`.
pub fn find_platform_versions(ndk: &Path) -> anyhow::Result<Vec<u32>> {
    let platforms = ndk.join("platforms");
    let mut levels = match fs::read_dir(&platforms) {
        Ok(entries) => entries
            .flat_map(Result::ok)
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|name| name.strip_prefix("android-"))
                    .and_then(|level| level.parse::<u32>().ok())
            })
            .collect::<Vec<_>>(),
        Err(_) => return platforms_from_meta(ndk),
    };

    if levels.is_empty() {
        bail!("no platforms found in {}", platforms.display());
    }
    levels.sort_unstable();
    levels.dedup();
    Ok(levels)
}

fn platforms_from_meta(ndk: &Path) -> anyhow::Result<Vec<u32>> {
    let path = ndk.join("meta").join("platforms.json");
    let content =
        fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
    let meta: PlatformsMeta = serde_json::from_slice(&content)
        .with_context(|| format!("invalid platform range in {}", path.display()))?;

    if meta.min > meta.max {
        bail!("no platforms found in {}", path.display());
    }
    Ok((meta.min..=meta.max).collect())
}
